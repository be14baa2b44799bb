use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use aeon_gate::OwnershipGate;
use aeon_roles::RoleRegistry;
use aeon_store::TypedStore;
use aeon_types::{Identity, StoreKey, StoreRef, Value};

use crate::error::{BindingError, BindingResult};
use crate::protocol::upgrader_role;
use crate::state::BindingState;

struct BindingInner<S: TypedStore> {
    state: BindingState,
    gate: Option<Arc<OwnershipGate<S>>>,
}

/// One generation of consuming logic.
///
/// A `LogicInstance` has its own identity (the identity the gate knows as
/// owner while this generation is bound), a shared role registry gating its
/// administrative entry points, and — once configured — a shared reference
/// to the ownership gate of the store it consumes.
///
/// The instance never mutates the store with a caller other than its own
/// identity; administrators act on it through role-gated entry points, not
/// by impersonating it.
pub struct LogicInstance<S: TypedStore> {
    identity: Identity,
    registry: Arc<RoleRegistry>,
    inner: RwLock<BindingInner<S>>,
}

impl<S: TypedStore> LogicInstance<S> {
    /// Create a fresh, unbound instance.
    pub fn new(identity: Identity, registry: Arc<RoleRegistry>) -> Self {
        info!(identity = %identity, "logic instance created (unbound)");
        Self {
            identity,
            registry,
            inner: RwLock::new(BindingInner {
                state: BindingState::Unbound,
                gate: None,
            }),
        }
    }

    /// The identity this instance acts as.
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Current binding state.
    pub fn binding_state(&self) -> BindingState {
        self.inner.read().expect("lock poisoned").state
    }

    /// Read-only accessor for the store reference, if configured.
    ///
    /// This is the seam upgrade tooling reads in step 2 of the protocol.
    pub fn store_reference(&self) -> Option<StoreRef> {
        self.inner
            .read()
            .expect("lock poisoned")
            .gate
            .as_ref()
            .map(|g| g.store_ref())
    }

    /// The shared gate itself, for re-targeting a successor at the same
    /// store. Handing out the gate grants no write authority — every write
    /// through it is still owner-checked.
    pub fn gate(&self) -> Option<Arc<OwnershipGate<S>>> {
        self.inner.read().expect("lock poisoned").gate.clone()
    }

    /// Configure this instance with a store reference (`Unbound →
    /// Configured`). Role-gated administrative setter: `caller` must hold
    /// the upgrader role.
    pub fn bind_store(
        &self,
        caller: &Identity,
        gate: Arc<OwnershipGate<S>>,
    ) -> BindingResult<()> {
        self.require_upgrader(caller)?;

        let mut inner = self.inner.write().expect("lock poisoned");
        if inner.state != BindingState::Unbound {
            return Err(BindingError::AlreadyConfigured);
        }
        debug!(
            identity = %self.identity,
            store = %gate.store_ref(),
            "logic instance configured with store reference"
        );
        inner.gate = Some(gate);
        inner.state = BindingState::Configured;
        Ok(())
    }

    /// Complete the binding (`Configured → Bound`).
    ///
    /// Succeeds only when the gate's current owner is this instance's
    /// identity, i.e. after ownership has actually been transferred here
    /// (or the gate was created with this instance as owner). Guards
    /// against declaring a binding the gate does not back.
    pub fn complete_binding(&self) -> BindingResult<()> {
        let mut inner = self.inner.write().expect("lock poisoned");
        match inner.state {
            BindingState::Configured => {}
            BindingState::Unbound => return Err(BindingError::NotConfigured),
            state => return Err(BindingError::NotBound { state }),
        }
        let gate = inner.gate.as_ref().expect("configured without gate");
        if gate.owner() != self.identity {
            return Err(BindingError::StoreMismatch);
        }
        info!(identity = %self.identity, store = %gate.store_ref(), "logic instance bound");
        inner.state = BindingState::Bound;
        Ok(())
    }

    /// Role-gated entry point through which an administrator moves this
    /// instance's store to a successor identity. The instance itself is the
    /// gate-level caller; the administrator's authority is the upgrader
    /// role, checked here.
    ///
    /// On success this instance is `Retired` and every later write fails.
    pub fn transfer_store(&self, caller: &Identity, new_owner: Identity) -> BindingResult<()> {
        self.require_upgrader(caller)?;

        let mut inner = self.inner.write().expect("lock poisoned");
        if !inner.state.is_bound() {
            return Err(BindingError::NotBound { state: inner.state });
        }
        let gate = inner.gate.as_ref().expect("bound without gate");
        gate.transfer_ownership(&self.identity, new_owner)?;
        inner.state = BindingState::Retired;
        info!(
            identity = %self.identity,
            new_owner = %new_owner,
            "logic instance retired; store handed over"
        );
        Ok(())
    }

    /// Write a value through the gate as this instance.
    ///
    /// Fails with [`BindingError::NotBound`] unless the instance is `Bound`;
    /// after retirement the gate would reject the write anyway, but the
    /// state check reports the reason precisely.
    pub fn write_value(&self, key: &StoreKey, value: Value) -> BindingResult<()> {
        let inner = self.inner.read().expect("lock poisoned");
        if !inner.state.is_bound() {
            return Err(BindingError::NotBound { state: inner.state });
        }
        let gate = inner.gate.as_ref().expect("bound without gate");
        gate.write(&self.identity, key, value)?;
        Ok(())
    }

    /// Read a value through the gate. Available from `Configured` on, and
    /// still available after retirement — reads are ungated.
    pub fn read_value(&self, key: &StoreKey) -> BindingResult<Value> {
        let inner = self.inner.read().expect("lock poisoned");
        let gate = inner.gate.as_ref().ok_or(BindingError::NotConfigured)?;
        Ok(gate.read(key)?)
    }

    /// Whether this instance's registry grants `caller` the upgrader role.
    /// Used by the orchestration to pre-check both generations before any
    /// mutation when their registries differ.
    pub fn authorizes_upgrade(&self, caller: &Identity) -> bool {
        self.registry.has_role(upgrader_role(), caller)
    }

    fn require_upgrader(&self, caller: &Identity) -> BindingResult<()> {
        let role = upgrader_role();
        if self.registry.has_role(role, caller) {
            Ok(())
        } else {
            debug!(caller = %caller, role = %role, "binding entry point denied");
            Err(BindingError::MissingRole {
                caller: *caller,
                role,
            })
        }
    }
}

impl<S: TypedStore> std::fmt::Debug for LogicInstance<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogicInstance")
            .field("identity", &self.identity)
            .field("state", &self.binding_state())
            .finish()
    }
}
