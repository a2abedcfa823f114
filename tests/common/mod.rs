//! Dependencies and systems under test shared by the integration tests.

#![allow(dead_code)]

use autosub::prelude::*;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

// =============================================================================
// Dependencies
// =============================================================================

pub trait TextGenerator: Send + Sync {
    fn generate(&self) -> String;
    fn combine(&self, pre: &str, post: &str) -> String;
    fn process(&self);
    fn value(&self) -> String;
    fn set_value(&self, value: String);
}

pub struct TextGeneratorSubstitute {
    calls: CallRecorder,
}

impl TextGenerator for TextGeneratorSubstitute {
    fn generate(&self) -> String {
        self.calls.invoke("generate", vec![])
    }

    fn combine(&self, pre: &str, post: &str) -> String {
        self.calls
            .invoke("combine", vec![Value::of(pre.to_string()), Value::of(post.to_string())])
    }

    fn process(&self) {
        self.calls.invoke("process", vec![])
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
        vec![
            Member::method("generate"),
            Member::method("combine"),
            Member::method("process"),
            Member::property("value"),
        ]
    }
}

pub struct HelloTextGenerator;

impl HelloTextGenerator {
    pub const TEXT: &'static str = "Hello";
}

impl TextGenerator for HelloTextGenerator {
    fn generate(&self) -> String {
        Self::TEXT.to_string()
    }

    fn combine(&self, pre: &str, post: &str) -> String {
        format!("{}{}{}", pre, Self::TEXT, post)
    }

    fn process(&self) {}

    fn value(&self) -> String {
        Self::TEXT.to_string()
    }

    fn set_value(&self, _value: String) {}
}

pub struct WorldTextGenerator;

impl WorldTextGenerator {
    pub const TEXT: &'static str = "World";
}

impl TextGenerator for WorldTextGenerator {
    fn generate(&self) -> String {
        Self::TEXT.to_string()
    }

    fn combine(&self, pre: &str, post: &str) -> String {
        format!("{}{}{}", pre, Self::TEXT, post)
    }

    fn process(&self) {}

    fn value(&self) -> String {
        Self::TEXT.to_string()
    }

    fn set_value(&self, _value: String) {}
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

/// Class-like dependency: partial substitutes fall through to `Greeting`
pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
    fn farewell(&self, name: &str) -> String;
}

pub struct Greeting;

impl Greeter for Greeting {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {}", name)
    }

    fn farewell(&self, name: &str) -> String {
        format!("Goodbye, {}", name)
    }
}

struct GreeterSubstitute {
    calls: CallRecorder,
    real: Option<Greeting>,
}

impl Greeter for GreeterSubstitute {
    fn greet(&self, name: &str) -> String {
        let args = vec![Value::of(name.to_string())];
        match &self.real {
            Some(real) => self.calls.invoke_or("greet", args, || real.greet(name)),
            None => self.calls.invoke("greet", args),
        }
    }

    fn farewell(&self, name: &str) -> String {
        let args = vec![Value::of(name.to_string())];
        match &self.real {
            Some(real) => self.calls.invoke_or("farewell", args, || real.farewell(name)),
            None => self.calls.invoke("farewell", args),
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
            real: Some(Greeting),
        }))
    }

    fn members() -> Vec<Member> {
        vec![Member::method("greet"), Member::method("farewell")]
    }
}

// =============================================================================
// Systems under test
// =============================================================================

pub struct SimpleSystem {
    text: Injected<dyn TextGenerator>,
    number: Injected<dyn NumberGenerator>,
}

impl SimpleSystem {
    pub fn text_result(&self) -> String {
        self.text.generate()
    }

    pub fn combine(&self) -> String {
        let text = self.text.generate();
        let number = self.number.generate();
        format!("{} {}", text, number)
    }

    pub fn combine_pre_post(&self, pre: &str, post: &str) -> String {
        self.text.combine(pre, post)
    }

    pub fn process(&self) {
        self.text.process()
    }

    pub fn value(&self) -> String {
        self.text.value()
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_null()
    }

    pub fn has_number(&self) -> bool {
        !self.number.is_null()
    }
}

impl Constructible for SimpleSystem {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::public(
            vec![Parameter::of::<dyn TextGenerator>(), Parameter::of::<dyn NumberGenerator>()],
            |args| {
                Ok(SimpleSystem {
                    text: args.single(0)?,
                    number: args.single(1)?,
                })
            },
        )]
    }
}

/// Records which of its constructors was used
pub struct MultipleConstructorSystem {
    pub arity: usize,
    pub text: Injected<dyn TextGenerator>,
    pub number: Injected<dyn NumberGenerator>,
}

impl Constructible for MultipleConstructorSystem {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::public(vec![], |_| {
                Ok(MultipleConstructorSystem {
                    arity: 0,
                    text: Injected::null(),
                    number: Injected::null(),
                })
            }),
            Constructor::public(vec![Parameter::of::<dyn TextGenerator>()], |args| {
                Ok(MultipleConstructorSystem {
                    arity: 1,
                    text: args.single(0)?,
                    number: Injected::null(),
                })
            }),
            Constructor::public(
                vec![Parameter::of::<dyn TextGenerator>(), Parameter::of::<dyn NumberGenerator>()],
                |args| {
                    Ok(MultipleConstructorSystem {
                        arity: 2,
                        text: args.single(0)?,
                        number: args.single(1)?,
                    })
                },
            ),
        ]
    }
}

/// The greedier constructor needs a plain `String` nobody supplied
pub struct FallbackSystem {
    pub arity: usize,
    pub prefix: Option<Arc<String>>,
    pub text: Injected<dyn TextGenerator>,
    pub number: Injected<dyn NumberGenerator>,
}

impl Constructible for FallbackSystem {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::public(vec![Parameter::of::<dyn NumberGenerator>()], |args| {
                Ok(FallbackSystem {
                    arity: 1,
                    prefix: None,
                    text: Injected::null(),
                    number: args.single(0)?,
                })
            }),
            Constructor::public(
                vec![Parameter::of::<dyn TextGenerator>(), Parameter::instance::<String>()],
                |args| {
                    Ok(FallbackSystem {
                        arity: 2,
                        prefix: Some(args.required(1)?),
                        text: args.single(0)?,
                        number: Injected::null(),
                    })
                },
            ),
        ]
    }
}

pub struct EmptySystem;

impl EmptySystem {
    pub fn run(&self) -> &'static str {
        "ran"
    }
}

impl Constructible for EmptySystem {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::public(vec![], |_| Ok(EmptySystem))]
    }
}

pub struct GreeterSystem {
    greeter: Injected<dyn Greeter>,
}

impl GreeterSystem {
    pub fn welcome(&self, name: &str) -> String {
        format!("{} / {}", self.greeter.greet(name), self.greeter.farewell(name))
    }
}

impl Constructible for GreeterSystem {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::public(vec![Parameter::of::<dyn Greeter>()], |args| {
            Ok(GreeterSystem {
                greeter: args.single(0)?,
            })
        })]
    }
}

/// Needs a plain value that can only be supplied with `use_instance`
pub struct PrefixedSystem {
    prefix: Arc<String>,
    text: Injected<dyn TextGenerator>,
}

impl PrefixedSystem {
    pub fn generate(&self) -> String {
        format!("{}{}", self.prefix, self.text.generate())
    }
}

impl Constructible for PrefixedSystem {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::public(
            vec![Parameter::instance::<String>(), Parameter::of::<dyn TextGenerator>()],
            |args| {
                Ok(PrefixedSystem {
                    prefix: args.required(0)?,
                    text: args.single(1)?,
                })
            },
        )]
    }
}

pub struct PrivateSystem {
    text: Injected<dyn TextGenerator>,
}

impl PrivateSystem {
    pub fn generate(&self) -> String {
        self.text.generate()
    }
}

impl Constructible for PrivateSystem {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::private(vec![Parameter::of::<dyn TextGenerator>()], |args| {
            Ok(PrivateSystem {
                text: args.single(0)?,
            })
        })]
    }
}

// =============================================================================
// Collection systems
// =============================================================================

pub trait CollectionSystem: Constructible {
    const SHAPE: CollectionShape;

    fn generators(&self) -> &Injected<[Arc<dyn TextGenerator>]>;

    fn generate(&self) -> String {
        self.generators()
            .iter()
            .map(|generator| generator.generate())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn count(&self) -> usize {
        self.generators().len()
    }
}

fn collection_constructor<T, F>(shape: CollectionShape, wrap: F) -> Vec<Constructor<T>>
where
    F: Fn(Injected<[Arc<dyn TextGenerator>]>) -> T + Send + Sync + 'static,
{
    vec![Constructor::public(
        vec![Parameter::collection_of::<dyn TextGenerator>(shape)],
        move |args| Ok(wrap(args.collection(0)?)),
    )]
}

pub struct EnumerableSystem(Injected<[Arc<dyn TextGenerator>]>);

impl Constructible for EnumerableSystem {
    fn constructors() -> Vec<Constructor<Self>> {
        collection_constructor(Self::SHAPE, EnumerableSystem)
    }
}

impl CollectionSystem for EnumerableSystem {
    const SHAPE: CollectionShape = CollectionShape::Enumerable;

    fn generators(&self) -> &Injected<[Arc<dyn TextGenerator>]> {
        &self.0
    }
}

pub struct VecSystem(Injected<[Arc<dyn TextGenerator>]>);

impl Constructible for VecSystem {
    fn constructors() -> Vec<Constructor<Self>> {
        collection_constructor(Self::SHAPE, VecSystem)
    }
}

impl CollectionSystem for VecSystem {
    const SHAPE: CollectionShape = CollectionShape::Vec;

    fn generators(&self) -> &Injected<[Arc<dyn TextGenerator>]> {
        &self.0
    }
}

pub struct ReadOnlySystem(Injected<[Arc<dyn TextGenerator>]>);

impl Constructible for ReadOnlySystem {
    fn constructors() -> Vec<Constructor<Self>> {
        collection_constructor(Self::SHAPE, ReadOnlySystem)
    }
}

impl CollectionSystem for ReadOnlySystem {
    const SHAPE: CollectionShape = CollectionShape::ReadOnly;

    fn generators(&self) -> &Injected<[Arc<dyn TextGenerator>]> {
        &self.0
    }
}

// =============================================================================
// Helpers
// =============================================================================

pub fn random_text() -> String {
    (0..12).map(|_| fastrand::alphanumeric()).collect()
}

/// Run `f`, returning the typed error it panicked with
pub fn raised<R>(f: impl FnOnce() -> R) -> Error {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => panic!("expected the call to raise"),
        Err(payload) => match payload.downcast::<Error>() {
            Ok(error) => *error,
            Err(_) => panic!("call panicked without an autosub error"),
        },
    }
}
