use aeon_types::{StoreKey, ValueKind};

/// Errors from typed store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A value of the wrong kind was written under a typed key.
    #[error("kind mismatch for {key}: key addresses {expected}, value is {actual}")]
    KindMismatch {
        key: StoreKey,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted log entry is malformed beyond the tolerated torn tail.
    #[error("corrupt log entry at offset {offset}: {reason}")]
    CorruptEntry { offset: u64, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
