// Call recorder shared by every substitute

use crate::call::{Call, CallKind, CallSpec};
use crate::error::{MockError, Result};
use crate::quantity::Quantity;
use crate::value::Value;
use parking_lot::Mutex;
use std::any::{Any, type_name};
use std::panic::panic_any;
use std::sync::Arc;
use tracing::trace;

type Raise = Arc<dyn Fn() + Send + Sync>;

struct Stub {
    spec: CallSpec,
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

struct ThrowRule {
    spec: CallSpec,
    raise: Raise,
}

#[derive(Default)]
struct RecorderState {
    calls: Vec<Call>,
    stubs: Vec<Stub>,
    throws: Vec<ThrowRule>,
}

enum Outcome {
    Stubbed(Arc<dyn Any + Send + Sync>, &'static str),
    Raise(Raise),
    Unconfigured,
}

/// Records the calls made on a substitute and answers them.
///
/// A substitute implementation forwards each member to the recorder:
///
/// ```
/// use autosub_mock::{CallRecorder, Value};
///
/// trait Greeter {
///     fn greet(&self, name: &str) -> String;
/// }
///
/// struct GreeterSubstitute {
///     calls: CallRecorder,
/// }
///
/// impl Greeter for GreeterSubstitute {
///     fn greet(&self, name: &str) -> String {
///         self.calls.invoke("greet", vec![Value::of(name.to_string())])
///     }
/// }
///
/// let calls = CallRecorder::new("Greeter");
/// let greeter = GreeterSubstitute { calls: calls.clone() };
/// calls.returns("greet", "hi".to_string());
///
/// assert_eq!(greeter.greet("bob"), "hi");
/// assert_eq!(calls.call_count(), 1);
/// ```
///
/// Calls are answered, most recent configuration first, by a matching stub,
/// then by a matching throw rule, then by the fallback (the default value for
/// full substitutes, the real implementation for partial ones).
#[derive(Clone)]
pub struct CallRecorder {
    type_name: Arc<str>,
    state: Arc<Mutex<RecorderState>>,
}

impl CallRecorder {
    /// Create a recorder for a substitute of `type_name`
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name: String = type_name.into();
        Self {
            type_name: Arc::from(type_name),
            state: Arc::new(Mutex::new(RecorderState::default())),
        }
    }

    /// Name of the substituted type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether both handles record into the same substitute
    pub fn same_as(&self, other: &CallRecorder) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Record a method call, answering unconfigured calls with `R::default()`
    ///
    /// A stub of the wrong type panics with a [`MockError::StubTypeMismatch`]
    /// payload.
    pub fn invoke<R>(&self, member: &str, args: Vec<Value>) -> R
    where
        R: Clone + Default + Any,
    {
        self.invoke_or(member, args, R::default)
    }

    /// Record a method call, answering unconfigured calls from `fallback`
    pub fn invoke_or<R, F>(&self, member: &str, args: Vec<Value>, fallback: F) -> R
    where
        R: Clone + Any,
        F: FnOnce() -> R,
    {
        self.answer(Call::new(CallKind::Method, member, args), fallback)
    }

    /// Record a property read
    pub fn get<R>(&self, member: &str) -> R
    where
        R: Clone + Default + Any,
    {
        self.get_or(member, R::default)
    }

    pub fn get_or<R, F>(&self, member: &str, fallback: F) -> R
    where
        R: Clone + Any,
        F: FnOnce() -> R,
    {
        self.answer(Call::new(CallKind::Get, member, Vec::new()), fallback)
    }

    /// Record a property write
    pub fn set(&self, member: &str, value: Value) {
        self.set_or(member, value, || ())
    }

    pub fn set_or<F>(&self, member: &str, value: Value, fallback: F)
    where
        F: FnOnce(),
    {
        self.answer(Call::new(CallKind::Set, member, vec![value]), fallback)
    }

    /// Answer calls matching `spec` with `value`
    pub fn returns<R>(&self, spec: impl Into<CallSpec>, value: R) -> &Self
    where
        R: Clone + Any + Send + Sync,
    {
        let spec = spec.into();
        trace!(substitute = %self.type_name, spec = %spec, "Configuring stub");

        self.state.lock().stubs.push(Stub {
            spec,
            value: Arc::new(value),
            type_name: type_name::<R>(),
        });
        self
    }

    /// Run `raise` for calls matching `spec` that have no stub.
    ///
    /// `raise` is expected to panic; if it returns, the call falls through
    /// to its fallback.
    pub fn throws<F>(&self, spec: impl Into<CallSpec>, raise: F) -> &Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let spec = spec.into();
        trace!(substitute = %self.type_name, spec = %spec, "Configuring throw rule");

        self.state.lock().throws.push(ThrowRule {
            spec,
            raise: Arc::new(raise),
        });
        self
    }

    /// All calls received so far, oldest first
    pub fn received_calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Number of received calls described by `spec`
    pub fn received_count(&self, spec: &CallSpec) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| spec.matches(call))
            .count()
    }

    pub fn was_received(&self, spec: &CallSpec) -> bool {
        self.received_count(spec) > 0
    }

    /// Check that the calls described by `spec` were received `quantity` times
    pub fn assert_received(&self, spec: &CallSpec, quantity: Quantity) -> Result<()> {
        let state = self.state.lock();
        let actual = state.calls.iter().filter(|call| spec.matches(call)).count();

        if quantity.matches(actual) {
            return Ok(());
        }

        let received = state
            .calls
            .iter()
            .map(|call| call.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        Err(MockError::ReceivedCallsMismatch {
            type_name: self.type_name.to_string(),
            spec: spec.to_string(),
            expected: quantity,
            actual,
            received,
        })
    }

    /// Forget received calls, keeping stubs and throw rules
    pub fn clear_received_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn record(&self, call: Call) -> Outcome {
        let mut state = self.state.lock();

        let outcome = if let Some(stub) = state.stubs.iter().rev().find(|s| s.spec.matches(&call)) {
            Outcome::Stubbed(stub.value.clone(), stub.type_name)
        } else if let Some(rule) = state.throws.iter().rev().find(|r| r.spec.matches(&call)) {
            Outcome::Raise(rule.raise.clone())
        } else {
            Outcome::Unconfigured
        };

        trace!(substitute = %self.type_name, call = %call, "Recorded call");
        state.calls.push(call);
        outcome
    }

    // The lock is released before stubs are cloned out, rules raised or
    // fallbacks run, so fallbacks may call back into the recorder.
    fn answer<R, F>(&self, call: Call, fallback: F) -> R
    where
        R: Clone + Any,
        F: FnOnce() -> R,
    {
        let member = call.member.clone();

        match self.record(call) {
            Outcome::Stubbed(value, stub_type) => match value.downcast_ref::<R>() {
                Some(value) => value.clone(),
                None => {
                    let error = MockError::StubTypeMismatch {
                        type_name: self.type_name.to_string(),
                        member,
                        stub_type: stub_type.to_string(),
                        expected_type: type_name::<R>().to_string(),
                    };
                    panic_any(error)
                }
            },
            Outcome::Raise(raise) => {
                raise();
                fallback()
            }
            Outcome::Unconfigured => fallback(),
        }
    }
}

impl std::fmt::Debug for CallRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallRecorder")
            .field("type_name", &self.type_name)
            .field("calls", &self.call_count())
            .finish()
    }
}
