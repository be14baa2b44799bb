//! Role-hierarchy access control for Aeon Store.
//!
//! The [`RoleRegistry`] manages role membership and the role-admin relation:
//! each role is granted and revoked by holders of its admin role, and the
//! admin edges form a rooted forest terminating at the self-administering
//! root role. The registry is independent of the store — consuming logic
//! uses it to gate its own operations, including requesting ownership
//! transfer of a store during an upgrade.
//!
//! # Bootstrap
//!
//! At construction the creating identity is granted [`RoleId::root()`],
//! and the root role is its own admin. The registry does not stop the last
//! root holder from being revoked; keeping at least one root holder is an
//! invariant consuming code must preserve.
//!
//! [`RoleId::root()`]: aeon_types::RoleId::root

pub mod error;
pub mod registry;

pub use error::{RoleError, RoleResult};
pub use registry::RoleRegistry;
