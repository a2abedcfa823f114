//! Core of the autosub auto-substituting dependency container.
//!
//! [`AutoSubstitute`] builds a system under test through its best
//! constructor, supplying a substitute for every dependency the test did not
//! configure. What happens to unconfigured dependencies is decided by the
//! container's [`SubstituteBehaviour`]:
//!
//! | behaviour              | interfaces          | classes            | collections             |
//! |------------------------|---------------------|--------------------|-------------------------|
//! | `Automatic`            | full substitute     | partial substitute | empty                   |
//! | `LooseParts`           | full substitute     | partial substitute | empty                   |
//! | `ManualWithNulls`      | null                | null               | null                    |
//! | `ManualWithExceptions` | throwing substitute | error              | one throwing substitute |
//!
//! Dependencies take part by implementing [`Substitutable`] (usually for a
//! `dyn Trait`), systems under test by implementing [`Constructible`].

pub mod behaviour;
pub mod config;
pub mod constructor;
pub mod container;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
mod factory;
pub mod logging;
pub mod messages;
pub mod registry;
mod resolver;
pub mod substitute;
mod verification;

#[cfg(test)]
mod test_support;

pub use behaviour::SubstituteBehaviour;
pub use config::AutoSubstituteConfig;
pub use constructor::{
    Accessibility, Arguments, Constructible, Constructor, Injected, Parameter, Visibility,
};
pub use container::{AutoSubstitute, ServiceProvider};
pub use descriptor::{
    CollectionShape, DependencyKind, Instance, Substitutable, TypeDescriptor, TypeKey, TypeTag,
    short_type_name,
};
pub use diagnostics::DiagnosticsHandler;
pub use error::{Error, Result};
pub use messages::FailureKind;
pub use registry::{SubstituteEntry, SubstituteMode, TypeRegistry};
pub use substitute::Substitute;

pub use autosub_mock as mock;
pub use autosub_mock::{
    Arg, Call, CallKind, CallRecorder, CallSpec, Member, MockError, Quantity, Value,
};
