use tracing::info;

use aeon_gate::GateError;
use aeon_store::TypedStore;
use aeon_types::{Identity, RoleId, StoreRef};

use crate::error::{BindingError, BindingResult};
use crate::logic::LogicInstance;
use crate::state::BindingState;

/// The role required to configure logic instances and order handovers.
///
/// Its admin defaults to the root role, so a freshly constructed registry's
/// creator can grant it without further setup.
pub fn upgrader_role() -> RoleId {
    RoleId::named("upgrader")
}

/// Re-bind a store from an old logic generation to a new one.
///
/// Performs the full upgrade sequence on behalf of `admin`, who must hold
/// the upgrader role: read the store reference from `old`, configure `new`
/// with it, transfer gate ownership from `old`'s identity to `new`'s, and
/// complete `new`'s binding. Returns the reference of the store that moved.
///
/// Preconditions are checked before anything mutates: a failure reported
/// here leaves both instances in the state they were in before the call.
pub fn rebind<S: TypedStore>(
    admin: &Identity,
    old: &LogicInstance<S>,
    new: &LogicInstance<S>,
) -> BindingResult<StoreRef> {
    // Validate everything up front so no step can fail after the first
    // mutation. `bind_store` and `transfer_store` re-check the role; the
    // state checks here are the cross-instance ones they cannot see.
    let gate = old.gate().ok_or(BindingError::NotConfigured)?;
    if !old.binding_state().is_bound() {
        return Err(BindingError::NotBound {
            state: old.binding_state(),
        });
    }
    if new.binding_state() != BindingState::Unbound {
        return Err(BindingError::AlreadyConfigured);
    }
    // The gate would refuse a null new owner only at transfer time, after
    // the successor is already configured; reject it here instead so the
    // no-partial-effect contract holds.
    if new.identity().is_null() {
        return Err(BindingError::Gate(GateError::InvalidOwner));
    }
    if gate.owner() != old.identity() {
        return Err(BindingError::StoreMismatch);
    }
    for instance in [old, new] {
        if !instance.authorizes_upgrade(admin) {
            return Err(BindingError::MissingRole {
                caller: *admin,
                role: upgrader_role(),
            });
        }
    }

    let store_ref = gate.store_ref();
    new.bind_store(admin, gate)?;
    old.transfer_store(admin, new.identity())?;
    new.complete_binding()?;

    info!(
        store = %store_ref,
        old = %old.identity(),
        new = %new.identity(),
        admin = %admin,
        "store re-bound to new logic generation"
    );
    Ok(store_ref)
}
