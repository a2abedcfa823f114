// autosub - auto-mocking dependency container for unit tests
//
// Builds the system under test through its best constructor, substituting
// every dependency the test did not supply.

// Re-export core functionality
pub use autosub_core::*;

/// Commonly used types for writing substitutes and tests
pub mod prelude {
    pub use crate::{
        Arg,
        Arguments,
        AutoSubstitute,
        AutoSubstituteConfig,
        CallKind,
        CallRecorder,
        CallSpec,
        CollectionShape,
        Constructible,
        Constructor,
        DependencyKind,
        Error,
        Injected,
        Member,
        MockError,
        Parameter,
        Quantity,
        Result,
        ServiceProvider,
        Substitutable,
        Substitute,
        SubstituteBehaviour,
        SubstituteMode,
        TypeKey,
        Value,
    };
}
