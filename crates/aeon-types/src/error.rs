use thiserror::Error;

/// Errors from parsing or constructing foundation types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// Input was not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Input had the wrong byte length.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
