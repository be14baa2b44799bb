//! Typed key-value storage for Aeon Store.
//!
//! This crate implements the storage half of the eternal-storage pattern: a
//! flat mapping from derived [`StoreKey`](aeon_types::StoreKey)s to primitive
//! [`Value`](aeon_types::Value)s, with no access control of its own. Gating
//! is layered on top by `aeon-gate`, so the same store can be reused under
//! different gating policies.
//!
//! # Semantics
//!
//! - Absence is not an error: reading a never-written key returns the zero
//!   value for the key's kind, mirroring an always-addressable flat address
//!   space.
//! - Each write is atomic with respect to its single key; there is no
//!   multi-key transaction.
//! - There is no deletion distinct from writing the zero value.
//!
//! # Backends
//!
//! All backends implement the [`TypedStore`] trait:
//!
//! - [`InMemoryStore`] — `HashMap`-based store for tests and embedding
//! - [`LogStore`] — append-only file-backed store with CRC-framed entries
//!   and replay-on-open recovery

pub mod error;
pub mod log;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use log::{LogConfig, LogStore};
pub use memory::InMemoryStore;
pub use traits::TypedStore;
