// Error types for the auto-substituting container

use autosub_mock::{CallKind, MockError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{message}")]
    NoSuitableConstructor { type_name: String, message: String },

    #[error(
        "Substitute type '{type_name}' has been created using mixed means. Only one of these (e.g. substitute_for/substitute_for_parts_of/use_instance/use_collection) should be used when testing to avoid confusion of which should be used."
    )]
    SubstituteConflict { type_name: String },

    /// Raised by exception-throwing substitutes when a member is invoked
    #[error("{message}")]
    MemberNotConfigured {
        type_name: String,
        member: String,
        kind: CallKind,
        message: String,
    },

    #[error(
        "Only interfaces are usable when using 'Manual with Exceptions' behaviour, '{type_name}' is not an interface"
    )]
    OnlyInterfacesSupported { type_name: String },

    #[error("Service '{type_name}' has not been registered with the container")]
    ServiceNotRegistered { type_name: String },

    #[error("{message}")]
    VerificationTargetNotFound { type_name: String, message: String },

    #[error(
        "'{type_name}' was supplied with 'use_instance' and is not a substitute, so it cannot be configured or checked for received calls"
    )]
    NotASubstitute { type_name: String },

    #[error("Cannot create a substitute for '{type_name}', the type is not substitutable")]
    CannotSubstitute { type_name: String },

    #[error("'{type_name}' does not support partial substitutes")]
    PartialSubstituteUnsupported { type_name: String },

    #[error("Constructor argument {index} of '{target}' could not be read as '{expected}'")]
    ArgumentMismatch {
        target: String,
        index: usize,
        expected: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Mock(#[from] MockError),
}

pub type Result<T> = std::result::Result<T, Error>;
