//! Foundation types for Aeon Store.
//!
//! This crate provides the identity, key, value, and role primitives used
//! throughout the Aeon Store system. Every other Aeon crate depends on
//! `aeon-types`.
//!
//! # Key Types
//!
//! - [`Identity`] — 32-byte caller/owner identity derived from genesis material
//! - [`StoreKey`] — fixed-width typed storage key derived from a namespace and name
//! - [`Value`] — the four primitive value kinds a store entry can hold
//! - [`RoleId`] — named capability identifier for the role registry
//! - [`StoreRef`] — queryable identifier locating a deployed store instance

pub mod error;
pub mod identity;
pub mod key;
pub mod role;
pub mod storeref;
pub mod value;

pub use error::TypeError;
pub use identity::{Identity, IdentityMaterial};
pub use key::StoreKey;
pub use role::RoleId;
pub use storeref::StoreRef;
pub use value::{Value, ValueKind};
