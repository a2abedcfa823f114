// Calls, call specifications and declared members

use crate::value::{Arg, Value};
use std::fmt;

/// How a member was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// Ordinary method call
    Method,
    /// Property getter
    Get,
    /// Property setter
    Set,
}

impl CallKind {
    /// Member category used in messages ("method" or "property")
    pub fn describe(&self) -> &'static str {
        match self {
            CallKind::Method => "method",
            CallKind::Get | CallKind::Set => "property",
        }
    }
}

/// A call received by a substitute.
#[derive(Debug, Clone)]
pub struct Call {
    pub kind: CallKind,
    pub member: String,
    pub args: Vec<Value>,
}

impl Call {
    pub fn new(kind: CallKind, member: &str, args: Vec<Value>) -> Self {
        Self {
            kind,
            member: member.to_string(),
            args,
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<&str> = self.args.iter().map(Value::repr).collect();
        match self.kind {
            CallKind::Method => write!(f, "{}({})", self.member, args.join(", ")),
            CallKind::Get => write!(f, "get {}", self.member),
            CallKind::Set => write!(f, "set {} = {}", self.member, args.join(", ")),
        }
    }
}

/// Describes which calls a stub, throw rule or assertion applies to.
///
/// Without explicit argument matchers every call to the member matches.
#[derive(Debug, Clone)]
pub struct CallSpec {
    kind: CallKind,
    member: String,
    args: Option<Vec<Arg>>,
}

impl CallSpec {
    /// Calls to the method `member`
    pub fn method(member: &str) -> Self {
        Self::new(CallKind::Method, member)
    }

    /// Reads of the property `member`
    pub fn getter(member: &str) -> Self {
        Self::new(CallKind::Get, member)
    }

    /// Writes of the property `member`
    pub fn setter(member: &str) -> Self {
        Self::new(CallKind::Set, member)
    }

    fn new(kind: CallKind, member: &str) -> Self {
        Self {
            kind,
            member: member.to_string(),
            args: None,
        }
    }

    /// Append a positional argument matcher
    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.get_or_insert_with(Vec::new).push(arg);
        self
    }

    /// Replace the argument matchers
    pub fn with_args(mut self, args: Vec<Arg>) -> Self {
        self.args = Some(args);
        self
    }

    pub fn kind(&self) -> CallKind {
        self.kind
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    /// Check whether a received call is described by this spec
    pub fn matches(&self, call: &Call) -> bool {
        if self.kind != call.kind || self.member != call.member {
            return false;
        }

        match &self.args {
            None => true,
            Some(args) => {
                args.len() == call.args.len()
                    && args.iter().zip(&call.args).all(|(arg, value)| arg.matches(value))
            }
        }
    }
}

impl From<&str> for CallSpec {
    fn from(member: &str) -> Self {
        CallSpec::method(member)
    }
}

impl fmt::Display for CallSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = match &self.args {
            None => "..".to_string(),
            Some(args) => args
                .iter()
                .map(|arg| format!("{:?}", arg))
                .collect::<Vec<_>>()
                .join(", "),
        };
        match self.kind {
            CallKind::Method => write!(f, "{}({})", self.member, args),
            CallKind::Get => write!(f, "get {}", self.member),
            CallKind::Set => write!(f, "set {} = {}", self.member, args),
        }
    }
}

/// A public member declared by a substitutable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Method(&'static str),
    Property {
        name: &'static str,
        get: bool,
        set: bool,
    },
}

impl Member {
    pub fn method(name: &'static str) -> Self {
        Member::Method(name)
    }

    /// A property with both accessors
    pub fn property(name: &'static str) -> Self {
        Member::Property {
            name,
            get: true,
            set: true,
        }
    }

    pub fn read_only(name: &'static str) -> Self {
        Member::Property {
            name,
            get: true,
            set: false,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Member::Method(name) => name,
            Member::Property { name, .. } => name,
        }
    }

    /// One spec per way of reaching the member, accessors counted once each
    pub fn accessors(&self) -> Vec<CallSpec> {
        match *self {
            Member::Method(name) => vec![CallSpec::method(name)],
            Member::Property { name, get, set } => {
                let mut specs = Vec::with_capacity(2);
                if get {
                    specs.push(CallSpec::getter(name));
                }
                if set {
                    specs.push(CallSpec::setter(name));
                }
                specs
            }
        }
    }
}
