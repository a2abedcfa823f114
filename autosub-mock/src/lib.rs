//! Call recording engine for autosub substitutes.
//!
//! Rust has no runtime proxy generation, so a substitute is a small
//! hand-written type implementing the dependency trait by forwarding every
//! member to a [`CallRecorder`]. The recorder provides what a mocking
//! library would:
//!
//! - **Call recording** with captured [`Value`] arguments
//! - **Stubs** answering calls that match a [`CallSpec`]
//! - **Throw rules** for members that must not be reached
//! - **Received assertions** with [`Quantity`] expectations
//!
//! ```
//! use autosub_mock::{Arg, CallRecorder, CallSpec, Quantity, Value};
//!
//! let calls = CallRecorder::new("Formatter");
//! calls.returns(
//!     CallSpec::method("format").arg(Arg::eq(7i32)),
//!     "seven".to_string(),
//! );
//!
//! let text: String = calls.invoke("format", vec![Value::of(7i32)]);
//! assert_eq!(text, "seven");
//!
//! calls
//!     .assert_received(&CallSpec::method("format"), Quantity::once())
//!     .unwrap();
//! ```

mod call;
pub mod error;
mod quantity;
mod recorder;
mod value;

pub use call::{Call, CallKind, CallSpec, Member};
pub use error::MockError;
pub use quantity::Quantity;
pub use recorder::CallRecorder;
pub use value::{Arg, Value};
