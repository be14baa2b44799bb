//! Logic-binding upgrade protocol for Aeon Store.
//!
//! This crate implements the handover half of the eternal-storage pattern:
//! a [`LogicInstance`] is one generation of consuming logic bound to a
//! gated store, and [`rebind`] moves write authority from an old generation
//! to a new one without any window in which two generations can write or
//! the store is unowned.
//!
//! # Protocol
//!
//! 1. The new instance is created `Unbound` (it holds no store reference).
//! 2. An administrator holding the upgrader role reads the store reference
//!    from the old instance.
//! 3. The administrator configures the new instance with that reference
//!    (`Unbound → Configured`).
//! 4. Acting through the old instance's role-gated entry point, the
//!    administrator transfers gate ownership to the new instance
//!    (`Configured → Bound`; the old instance becomes `Retired`).
//!
//! From that point the old generation's writes fail and the new
//! generation's succeed. Reads remain available through either instance,
//! since reads are ungated.

pub mod error;
pub mod logic;
pub mod protocol;
pub mod state;

pub use error::{BindingError, BindingResult};
pub use logic::LogicInstance;
pub use protocol::{rebind, upgrader_role};
pub use state::BindingState;
