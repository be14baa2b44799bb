//! Observable events for Aeon Store.
//!
//! Every administrative mutation in the system — ownership transfers, role
//! grants and revocations, role-admin rewires — records a [`StorageEvent`]
//! carrying the acting identity and the affected key material. External
//! monitors and indexers consume these through an [`EventSink`].
//!
//! The sink is a seam, not a bus: components hold an `Arc<dyn EventSink>`
//! injected at construction, so tests can capture events with an
//! [`InMemoryEventLog`] while embedders wire in their own indexer.

pub mod event;
pub mod sink;

pub use event::StorageEvent;
pub use sink::{EventSink, InMemoryEventLog, NullSink};
