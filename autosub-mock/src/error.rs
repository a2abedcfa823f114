// Error types for the call recording engine

use crate::Quantity;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    #[error(
        "Expected '{type_name}' to receive {expected} matching '{spec}' but received {actual}. Received calls: [{received}]"
    )]
    ReceivedCallsMismatch {
        type_name: String,
        spec: String,
        expected: Quantity,
        actual: usize,
        received: String,
    },

    #[error(
        "Stub for '{member}' on '{type_name}' returns '{stub_type}' but the member returns '{expected_type}'"
    )]
    StubTypeMismatch {
        type_name: String,
        member: String,
        stub_type: String,
        expected_type: String,
    },
}

pub type Result<T> = std::result::Result<T, MockError>;
