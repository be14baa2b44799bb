use std::fmt;

use aeon_types::Identity;

/// The mutating operations an ownership gate exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationOp {
    /// Write a value through the gate.
    Write,
    /// Replace the owner reference.
    TransferOwnership,
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Write => "write",
            Self::TransferOwnership => "transfer ownership",
        };
        write!(f, "{s}")
    }
}

/// Outcome of an authorization check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    /// The caller may proceed.
    Allow,
    /// The caller is rejected before any state change.
    Deny { reason: String },
}

impl AccessDecision {
    /// Returns `true` if the decision is `Allow`.
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Pure ownership authorization check.
///
/// Called at the top of every mutating entry point, before any state is
/// touched. Takes the operation, the caller, and the current owner; returns
/// allow/deny and nothing else — no side effects, no clock, no I/O.
pub fn authorize(op: MutationOp, caller: &Identity, owner: &Identity) -> AccessDecision {
    if caller.is_null() {
        return AccessDecision::Deny {
            reason: format!("the null identity may not {op}"),
        };
    }
    if caller != owner {
        return AccessDecision::Deny {
            reason: format!("{caller} is not the current owner {owner}"),
        };
    }
    AccessDecision::Allow
}
