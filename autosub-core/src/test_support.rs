// Dependency fixtures shared by the unit tests

use crate::descriptor::{DependencyKind, Substitutable};
use crate::{Constructible, Constructor, Injected, Parameter};
use autosub_mock::{CallRecorder, Member, Value};
use std::sync::Arc;

pub trait TextGenerator: Send + Sync {
    fn generate(&self) -> String;
    fn value(&self) -> String;
    fn set_value(&self, value: String);
}

struct TextGeneratorSubstitute {
    calls: CallRecorder,
}

impl TextGenerator for TextGeneratorSubstitute {
    fn generate(&self) -> String {
        self.calls.invoke("generate", vec![])
    }

    fn value(&self) -> String {
        self.calls.get("value")
    }

    fn set_value(&self, value: String) {
        self.calls.set("value", Value::of(value))
    }
}

impl Substitutable for dyn TextGenerator {
    fn substitute(calls: CallRecorder) -> Arc<Self> {
        Arc::new(TextGeneratorSubstitute { calls })
    }

    fn members() -> Vec<Member> {
        vec![Member::method("generate"), Member::property("value")]
    }
}

pub trait NumberGenerator: Send + Sync {
    fn generate(&self) -> i32;
}

struct NumberGeneratorSubstitute {
    calls: CallRecorder,
}

impl NumberGenerator for NumberGeneratorSubstitute {
    fn generate(&self) -> i32 {
        self.calls.invoke("generate", vec![])
    }
}

impl Substitutable for dyn NumberGenerator {
    fn substitute(calls: CallRecorder) -> Arc<Self> {
        Arc::new(NumberGeneratorSubstitute { calls })
    }

    fn members() -> Vec<Member> {
        vec![Member::method("generate")]
    }
}

/// Class-like dependency with a real implementation
pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

pub struct HelloGreeter;

impl Greeter for HelloGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {}", name)
    }
}

struct GreeterSubstitute {
    calls: CallRecorder,
    real: Option<HelloGreeter>,
}

impl Greeter for GreeterSubstitute {
    fn greet(&self, name: &str) -> String {
        let args = vec![Value::of(name.to_string())];
        match &self.real {
            Some(real) => self.calls.invoke_or("greet", args, || real.greet(name)),
            None => self.calls.invoke("greet", args),
        }
    }
}

impl Substitutable for dyn Greeter {
    fn kind() -> DependencyKind {
        DependencyKind::Class
    }

    fn substitute(calls: CallRecorder) -> Arc<Self> {
        Arc::new(GreeterSubstitute { calls, real: None })
    }

    fn partial(calls: CallRecorder) -> Option<Arc<Self>> {
        Some(Arc::new(GreeterSubstitute {
            calls,
            real: Some(HelloGreeter),
        }))
    }

    fn members() -> Vec<Member> {
        vec![Member::method("greet")]
    }
}

/// System under test with a greedy and a lean constructor
pub struct Simple {
    pub text: Injected<dyn TextGenerator>,
    pub number: Injected<dyn NumberGenerator>,
}

impl Constructible for Simple {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::public(vec![Parameter::of::<dyn TextGenerator>()], |args| {
                Ok(Simple {
                    text: args.single(0)?,
                    number: Injected::null(),
                })
            }),
            Constructor::public(
                vec![Parameter::of::<dyn TextGenerator>(), Parameter::of::<dyn NumberGenerator>()],
                |args| {
                    Ok(Simple {
                        text: args.single(0)?,
                        number: args.single(1)?,
                    })
                },
            ),
        ]
    }
}
