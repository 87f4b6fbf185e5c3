//! Failure classification.
//!
//! Maps whatever an operation failed with onto a closed set of error kinds,
//! each carrying a canonical user-facing message. Only the rendered message
//! text of the raw error is inspected.

mod error;
mod kind;
mod rules;

pub use error::ClassifiedError;
pub use kind::ErrorKind;
pub use rules::{classify, classify_message};
