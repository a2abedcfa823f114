// Recorded argument values and argument matchers

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A type-erased argument captured when a substitute member is invoked.
///
/// The `Debug` rendering of the original value is kept so received-call
/// failures can list what was actually passed.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    repr: String,
}

impl Value {
    /// Capture an owned argument value
    pub fn of<T>(value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug,
    {
        let repr = format!("{:?}", value);
        Self {
            inner: Arc::new(value),
            repr,
        }
    }

    /// Borrow the captured value as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Debug rendering of the captured value
    pub fn repr(&self) -> &str {
        &self.repr
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Matches one positional argument of a call.
#[derive(Clone)]
pub enum Arg {
    /// Any value matches
    Any,
    /// Only values accepted by the predicate match
    Matches {
        description: String,
        predicate: Predicate,
    },
}

impl Arg {
    /// Match any value
    pub fn any() -> Self {
        Arg::Any
    }

    /// Match values equal to `expected`.
    ///
    /// The recorded value must have the same type as `expected`, so string
    /// arguments recorded as `String` are matched with `Arg::eq("x".to_string())`.
    pub fn eq<T>(expected: T) -> Self
    where
        T: PartialEq + Any + Send + Sync + fmt::Debug,
    {
        let description = format!("{:?}", expected);
        Arg::Matches {
            description,
            predicate: Arc::new(move |value: &Value| value.downcast_ref::<T>() == Some(&expected)),
        }
    }

    /// Match values of type `T` accepted by `predicate`
    pub fn is<T, F>(description: &str, predicate: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Arg::Matches {
            description: description.to_string(),
            predicate: Arc::new(move |value: &Value| {
                value.downcast_ref::<T>().is_some_and(&predicate)
            }),
        }
    }

    /// Check a recorded value against this matcher
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Arg::Any => true,
            Arg::Matches { predicate, .. } => predicate(value),
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Any => f.write_str("any"),
            Arg::Matches { description, .. } => f.write_str(description),
        }
    }
}
