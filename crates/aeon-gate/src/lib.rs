//! Ownership gating for Aeon Store.
//!
//! The [`OwnershipGate`] wraps any [`TypedStore`](aeon_store::TypedStore)
//! and enforces the single-writer rule of the eternal-storage pattern:
//! exactly one owner identity may mutate the store at any time, reads are
//! public, and write authority moves between logic generations only through
//! an explicit [`transfer_ownership`](OwnershipGate::transfer_ownership).
//!
//! The authorization check itself is a pure function in [`policy`], called
//! at the top of every mutating entry point and kept separate from the
//! state mutation so it can be tested exhaustively on its own.

pub mod error;
pub mod gate;
pub mod policy;

pub use error::{GateError, GateResult};
pub use gate::OwnershipGate;
pub use policy::{authorize, AccessDecision, MutationOp};
