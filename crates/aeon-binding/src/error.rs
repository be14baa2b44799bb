use aeon_types::{Identity, RoleId};

use crate::state::BindingState;

/// Errors from logic-binding operations.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    /// The caller does not hold the role the entry point requires.
    #[error("unauthorized: {caller} does not hold {role}")]
    MissingRole { caller: Identity, role: RoleId },

    /// The instance holds no store reference yet.
    #[error("logic instance is not configured with a store reference")]
    NotConfigured,

    /// The instance already holds a store reference; it cannot be re-pointed.
    #[error("logic instance is already configured")]
    AlreadyConfigured,

    /// The instance is configured but does not own its store.
    #[error("logic instance is not bound (state: {state})")]
    NotBound { state: BindingState },

    /// The gate's current owner is not the identity the protocol expects.
    #[error("store ownership does not match the logic instance identity")]
    StoreMismatch,

    /// Error from the ownership gate.
    #[error(transparent)]
    Gate(#[from] aeon_gate::GateError),
}

/// Result alias for binding operations.
pub type BindingResult<T> = Result<T, BindingError>;
