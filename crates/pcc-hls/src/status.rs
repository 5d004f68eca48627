use thiserror::Error;

use crate::payload::PayloadType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HlsError {
    #[error("Buffer decode error: {0}")]
    BufferError(String),
    #[error("Malformed length: {0}")]
    MalformedLength(String),
    #[error("Unsupported extension: {0}")]
    UnsupportedExtension(String),
    #[error("Ordering violation: {0}")]
    OrderingViolation(String),
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Payload type mismatch: expected {expected:?}, found {actual:?}")]
    PayloadTypeMismatch {
        expected: PayloadType,
        actual: PayloadType,
    },
}

pub type Status = Result<(), HlsError>;

pub fn ok_status() -> Status {
    Ok(())
}
