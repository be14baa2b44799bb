use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a logic instance's binding to a store.
///
/// Transitions are strictly forward: `Unbound → Configured → Bound`, with
/// `Retired` as the terminal state after the instance hands its store to a
/// successor. No transition skips `Configured` — an instance must be told
/// the store reference before it can meaningfully receive ownership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingState {
    /// Freshly created; holds no store reference.
    Unbound,
    /// Knows its store reference but does not yet own the store.
    Configured,
    /// Owns the store; writes flow.
    Bound,
    /// Handed the store to a successor; writes permanently fail.
    Retired,
}

impl BindingState {
    /// Returns `true` if the instance may write through its gate.
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound)
    }

    /// Returns `true` if the instance holds a store reference.
    pub fn has_store(&self) -> bool {
        !matches!(self, Self::Unbound)
    }
}

impl fmt::Display for BindingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unbound => "unbound",
            Self::Configured => "configured",
            Self::Bound => "bound",
            Self::Retired => "retired",
        };
        write!(f, "{s}")
    }
}
