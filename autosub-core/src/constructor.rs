//! Constructor introspection.
//!
//! A system under test describes how it can be built by implementing
//! [`Constructible`]. Each [`Constructor`] lists its [`Parameter`]s and a
//! build function reading the resolved values back out of [`Arguments`]:
//!
//! ```
//! use autosub_core::{Constructible, Constructor, Injected, Parameter, Substitutable};
//! # use autosub_core::CallRecorder;
//! # use std::sync::Arc;
//!
//! pub trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//! # struct ClockSubstitute(CallRecorder);
//! # impl Clock for ClockSubstitute {
//! #     fn now(&self) -> u64 { self.0.invoke("now", vec![]) }
//! # }
//! # impl Substitutable for dyn Clock {
//! #     fn substitute(calls: CallRecorder) -> Arc<Self> { Arc::new(ClockSubstitute(calls)) }
//! # }
//!
//! pub struct Scheduler {
//!     clock: Injected<dyn Clock>,
//! }
//!
//! impl Constructible for Scheduler {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::public(vec![Parameter::of::<dyn Clock>()], |args| {
//!             Ok(Scheduler {
//!                 clock: args.single::<dyn Clock>(0)?,
//!             })
//!         })]
//!     }
//! }
//! ```

use crate::descriptor::{
    CollectionShape, Instance, Substitutable, TypeDescriptor, TypeKey, short_type_name,
};
use crate::{Error, Result};
use std::any::type_name;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A declared constructor parameter.
#[derive(Debug, Clone, Copy)]
pub struct Parameter {
    key: TypeKey,
    descriptor: TypeDescriptor,
}

impl Parameter {
    /// A substitutable dependency, usually `dyn Trait`
    pub fn of<D: ?Sized + Substitutable>() -> Self {
        Self {
            key: TypeKey::of::<D>(),
            descriptor: TypeDescriptor::substitutable::<D>(),
        }
    }

    /// A value that must be supplied with `use_instance`
    pub fn instance<T: ?Sized + Send + Sync + 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            descriptor: TypeDescriptor::opaque::<T>(),
        }
    }

    /// A collection of substitutable dependencies declared with `shape`
    pub fn collection_of<D: ?Sized + Substitutable>(shape: CollectionShape) -> Self {
        Self {
            key: TypeKey::collection_of::<D>(shape),
            descriptor: TypeDescriptor::substitutable::<D>(),
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Descriptor of the dependency, or of the element for collections
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn is_collection(&self) -> bool {
        self.key.is_collection()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Which constructors the resolver may consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    Public,
    All,
}

impl Accessibility {
    pub fn permits(&self, visibility: Visibility) -> bool {
        match self {
            Accessibility::Public => visibility == Visibility::Public,
            Accessibility::All => true,
        }
    }
}

type BuildFn<T> = Box<dyn Fn(&Arguments) -> Result<T> + Send + Sync>;

/// One way of building `T`.
pub struct Constructor<T> {
    parameters: Vec<Parameter>,
    visibility: Visibility,
    build: BuildFn<T>,
}

impl<T> Constructor<T> {
    pub fn public<F>(parameters: Vec<Parameter>, build: F) -> Self
    where
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        Self::new(parameters, Visibility::Public, build)
    }

    /// Only considered when private constructors are searched
    pub fn private<F>(parameters: Vec<Parameter>, build: F) -> Self
    where
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        Self::new(parameters, Visibility::Private, build)
    }

    fn new<F>(parameters: Vec<Parameter>, visibility: Visibility, build: F) -> Self
    where
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            parameters,
            visibility,
            build: Box::new(build),
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn invoke(&self, arguments: &Arguments) -> Result<T> {
        (self.build)(arguments)
    }

    /// Comma separated parameter type names
    pub fn describe(&self) -> String {
        self.parameters
            .iter()
            .map(|parameter| parameter.key().name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("visibility", &self.visibility)
            .field("parameters", &self.describe())
            .finish()
    }
}

/// A type the container can build.
pub trait Constructible: Sized + 'static {
    /// Every constructor, in declaration order
    fn constructors() -> Vec<Constructor<Self>>;
}

/// Resolved values for one constructor invocation, in parameter order.
///
/// A `None` value is a null dependency.
pub struct Arguments {
    target: &'static str,
    values: Vec<Option<Instance>>,
}

impl Arguments {
    pub fn new(target: &'static str, values: Vec<Option<Instance>>) -> Self {
        Self { target, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read the single dependency at `index`
    pub fn single<D: ?Sized + Send + Sync + 'static>(&self, index: usize) -> Result<Injected<D>> {
        match self.slot(index, type_name::<D>())? {
            None => Ok(Injected::null()),
            Some(value) => value
                .downcast_ref::<Arc<D>>()
                .map(|instance| Injected::new(instance.clone()))
                .ok_or_else(|| self.mismatch(index, type_name::<D>())),
        }
    }

    /// Read the collection of `D` at `index`
    pub fn collection<D: ?Sized + Send + Sync + 'static>(
        &self,
        index: usize,
    ) -> Result<Injected<[Arc<D>]>> {
        match self.slot(index, type_name::<Vec<Arc<D>>>())? {
            None => Ok(Injected::null()),
            Some(value) => value
                .downcast_ref::<Vec<Arc<D>>>()
                .map(|items| Injected::new(Arc::from(items.clone())))
                .ok_or_else(|| self.mismatch(index, type_name::<Vec<Arc<D>>>())),
        }
    }

    /// Read a required value supplied with `use_instance`
    pub fn required<T: ?Sized + Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>> {
        self.single::<T>(index)?
            .into_inner()
            .ok_or_else(|| self.mismatch(index, type_name::<T>()))
    }

    fn slot(&self, index: usize, expected: &str) -> Result<Option<&Instance>> {
        self.values
            .get(index)
            .map(Option::as_ref)
            .ok_or_else(|| self.mismatch(index, expected))
    }

    fn mismatch(&self, index: usize, expected: &str) -> Error {
        Error::ArgumentMismatch {
            target: short_type_name(self.target),
            index,
            expected: short_type_name(expected),
        }
    }
}

/// A dependency handed to the system under test, possibly null.
///
/// Dereferencing a null dependency panics, naming the missing type.
pub struct Injected<T: ?Sized>(Option<Arc<T>>);

impl<T: ?Sized> Injected<T> {
    pub fn new(value: Arc<T>) -> Self {
        Injected(Some(value))
    }

    pub fn null() -> Self {
        Injected(None)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<&Arc<T>> {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Option<Arc<T>> {
        self.0
    }
}

impl<T: ?Sized> Deref for Injected<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.0 {
            Some(value) => value.as_ref(),
            None => panic!(
                "null dependency: '{}' was not supplied when the instance was created",
                short_type_name(type_name::<T>())
            ),
        }
    }
}

impl<T: ?Sized> Clone for Injected<T> {
    fn clone(&self) -> Self {
        Injected(self.0.clone())
    }
}

impl<T: ?Sized> fmt::Debug for Injected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = short_type_name(type_name::<T>());
        match &self.0 {
            Some(_) => write!(f, "Injected({})", name),
            None => write!(f, "Injected({}: null)", name),
        }
    }
}
