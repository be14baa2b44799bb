use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use aeon_events::{EventSink, StorageEvent};
use aeon_store::TypedStore;
use aeon_types::{Identity, StoreKey, StoreRef, Value};

use crate::error::{GateError, GateResult};
use crate::policy::{authorize, AccessDecision, MutationOp};

/// Single-owner write gate over a typed store.
///
/// Holds the store, the current owner reference, and a minted [`StoreRef`]
/// through which administrators locate this instance. Reads pass straight
/// through; every mutation is authorized against the owner reference first.
///
/// The owner reference is never null: construction and transfer both reject
/// the null identity with [`GateError::InvalidOwner`], so there is no window
/// in which the store is unowned and universally writable.
///
/// Ownership transfer is single-step: the new owner takes effect the moment
/// the call returns and the old owner simultaneously loses write access.
/// It is an administrative operation, deliberately separate from the data
/// path, and logically irreversible except by a further transfer.
pub struct OwnershipGate<S: TypedStore> {
    store: S,
    owner: RwLock<Identity>,
    store_ref: StoreRef,
    events: Arc<dyn EventSink>,
}

impl<S: TypedStore> OwnershipGate<S> {
    /// Create a gate owned by `owner`, recording events to `events`.
    ///
    /// Fails with [`GateError::InvalidOwner`] if `owner` is null.
    pub fn new(store: S, owner: Identity, events: Arc<dyn EventSink>) -> GateResult<Self> {
        if owner.is_null() {
            return Err(GateError::InvalidOwner);
        }
        let store_ref = StoreRef::mint(&owner);
        info!(owner = %owner, store = %store_ref, "ownership gate created");
        Ok(Self {
            store,
            owner: RwLock::new(owner),
            store_ref,
            events,
        })
    }

    /// The current owner reference.
    pub fn owner(&self) -> Identity {
        *self.owner.read().expect("lock poisoned")
    }

    /// The queryable reference locating this store instance.
    pub fn store_ref(&self) -> StoreRef {
        self.store_ref
    }

    /// Shared access to the wrapped store for ungated inspection.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write a value, gated on `caller` being the current owner.
    pub fn write(&self, caller: &Identity, key: &StoreKey, value: Value) -> GateResult<()> {
        self.check(MutationOp::Write, caller)?;
        self.store.write(key, value)?;
        Ok(())
    }

    /// Read the value under a key. Unrestricted by design: only mutation
    /// is gated.
    pub fn read(&self, key: &StoreKey) -> GateResult<Value> {
        Ok(self.store.read(key)?)
    }

    /// Atomically replace the owner reference with `new_owner`.
    ///
    /// Fails with [`GateError::Unauthorized`] unless `caller` is the current
    /// owner, and with [`GateError::InvalidOwner`] if `new_owner` is null;
    /// both rejections precede any state change. On success records an
    /// [`StorageEvent::OwnershipTransferred`] event.
    pub fn transfer_ownership(&self, caller: &Identity, new_owner: Identity) -> GateResult<()> {
        // Hold the write lock across check and swap so no write can slip
        // between the authorization and the owner change.
        let mut owner = self.owner.write().expect("lock poisoned");
        match authorize(MutationOp::TransferOwnership, caller, &owner) {
            AccessDecision::Allow => {}
            AccessDecision::Deny { reason } => {
                debug!(caller = %caller, %reason, "transfer denied");
                return Err(GateError::Unauthorized {
                    op: MutationOp::TransferOwnership,
                    caller: *caller,
                });
            }
        }
        if new_owner.is_null() {
            return Err(GateError::InvalidOwner);
        }

        let previous_owner = *owner;
        *owner = new_owner;
        drop(owner);

        info!(
            store = %self.store_ref,
            previous = %previous_owner,
            new = %new_owner,
            "ownership transferred"
        );
        self.events.record(StorageEvent::OwnershipTransferred {
            store: self.store_ref,
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    // Typed convenience helpers mirroring the store's, with the caller
    // threaded through the gate check.

    pub fn write_uint(
        &self,
        caller: &Identity,
        namespace: &str,
        name: &str,
        value: u64,
    ) -> GateResult<()> {
        self.check(MutationOp::Write, caller)?;
        self.store.write_uint(namespace, name, value)?;
        Ok(())
    }

    pub fn read_uint(&self, namespace: &str, name: &str) -> GateResult<u64> {
        Ok(self.store.read_uint(namespace, name)?)
    }

    pub fn write_bool(
        &self,
        caller: &Identity,
        namespace: &str,
        name: &str,
        value: bool,
    ) -> GateResult<()> {
        self.check(MutationOp::Write, caller)?;
        self.store.write_bool(namespace, name, value)?;
        Ok(())
    }

    pub fn read_bool(&self, namespace: &str, name: &str) -> GateResult<bool> {
        Ok(self.store.read_bool(namespace, name)?)
    }

    pub fn write_text(
        &self,
        caller: &Identity,
        namespace: &str,
        name: &str,
        value: &str,
    ) -> GateResult<()> {
        self.check(MutationOp::Write, caller)?;
        self.store.write_text(namespace, name, value)?;
        Ok(())
    }

    pub fn read_text(&self, namespace: &str, name: &str) -> GateResult<String> {
        Ok(self.store.read_text(namespace, name)?)
    }

    pub fn write_identity(
        &self,
        caller: &Identity,
        namespace: &str,
        name: &str,
        value: Identity,
    ) -> GateResult<()> {
        self.check(MutationOp::Write, caller)?;
        self.store.write_identity(namespace, name, value)?;
        Ok(())
    }

    pub fn read_identity(&self, namespace: &str, name: &str) -> GateResult<Identity> {
        Ok(self.store.read_identity(namespace, name)?)
    }

    /// Run the pure authorization check against the current owner.
    fn check(&self, op: MutationOp, caller: &Identity) -> GateResult<()> {
        let owner = self.owner.read().expect("lock poisoned");
        match authorize(op, caller, &owner) {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny { reason } => {
                debug!(caller = %caller, %reason, "mutation denied");
                Err(GateError::Unauthorized {
                    op,
                    caller: *caller,
                })
            }
        }
    }
}

impl<S: TypedStore> std::fmt::Debug for OwnershipGate<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipGate")
            .field("store_ref", &self.store_ref)
            .field("owner", &self.owner())
            .finish()
    }
}
