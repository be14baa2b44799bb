use aeon_types::Identity;

use crate::policy::MutationOp;

/// Errors from gated store operations.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The caller is not the current owner.
    #[error("unauthorized: {caller} may not {op} (not the current owner)")]
    Unauthorized { op: MutationOp, caller: Identity },

    /// Attempted to make the null identity the owner.
    #[error("invalid owner: the null identity cannot own a store")]
    InvalidOwner,

    /// Error from the underlying store.
    #[error(transparent)]
    Store(#[from] aeon_store::StoreError),
}

/// Result alias for gate operations.
pub type GateResult<T> = Result<T, GateError>;
