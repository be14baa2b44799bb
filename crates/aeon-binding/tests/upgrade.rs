//! End-to-end upgrade protocol scenarios: a store surviving the replacement
//! of its consuming logic, with write authority moving exactly once.

use std::sync::Arc;

use aeon_binding::{rebind, upgrader_role, BindingError, BindingState, LogicInstance};
use aeon_events::{InMemoryEventLog, StorageEvent};
use aeon_gate::{GateError, OwnershipGate};
use aeon_roles::RoleRegistry;
use aeon_store::{InMemoryStore, LogStore, TypedStore};
use aeon_types::{Identity, StoreKey, Value, ValueKind};

struct Harness {
    admin: Identity,
    registry: Arc<RoleRegistry>,
    log: Arc<InMemoryEventLog>,
}

/// Registry created by `admin`, who grants the upgrader role to themselves.
fn harness() -> Harness {
    let admin = Identity::ephemeral();
    let log = Arc::new(InMemoryEventLog::new());
    let registry = Arc::new(RoleRegistry::new(admin, log.clone()));
    registry
        .grant_role(&admin, upgrader_role(), admin)
        .unwrap();
    Harness {
        admin,
        registry,
        log,
    }
}

/// Deploy a first-generation instance bound to a fresh in-memory store.
fn deploy_v1(h: &Harness) -> Arc<LogicInstance<InMemoryStore>> {
    let v1 = Arc::new(LogicInstance::new(
        Identity::ephemeral(),
        h.registry.clone(),
    ));
    let gate = Arc::new(
        OwnershipGate::new(InMemoryStore::new(), v1.identity(), h.log.clone()).unwrap(),
    );
    v1.bind_store(&h.admin, gate).unwrap();
    v1.complete_binding().unwrap();
    v1
}

#[test]
fn counter_survives_logic_upgrade() {
    // Owner A writes ("counter","n")=1, ownership moves to B, A's next
    // write fails and leaves 1, B writes 2 and reads it back.
    let h = harness();
    let key = StoreKey::derive("counter", "n", ValueKind::Uint);

    let v1 = deploy_v1(&h);
    v1.write_value(&key, Value::Uint(1)).unwrap();

    let v2 = LogicInstance::new(Identity::ephemeral(), h.registry.clone());
    assert_eq!(v2.binding_state(), BindingState::Unbound);

    let moved = rebind(&h.admin, &v1, &v2).unwrap();
    assert_eq!(Some(moved), v2.store_reference());
    assert_eq!(v1.binding_state(), BindingState::Retired);
    assert_eq!(v2.binding_state(), BindingState::Bound);

    // Old generation can no longer write; the value is untouched.
    let err = v1.write_value(&key, Value::Uint(99)).unwrap_err();
    assert!(matches!(err, BindingError::NotBound { .. }));
    assert_eq!(v2.read_value(&key).unwrap(), Value::Uint(1));

    // New generation writes; both generations can still read.
    v2.write_value(&key, Value::Uint(2)).unwrap();
    assert_eq!(v2.read_value(&key).unwrap(), Value::Uint(2));
    assert_eq!(v1.read_value(&key).unwrap(), Value::Uint(2));
}

#[test]
fn old_generation_is_rejected_at_the_gate_too() {
    // Even bypassing the binding-state check, the gate itself refuses the
    // retired generation's identity.
    let h = harness();
    let v1 = deploy_v1(&h);
    let gate = v1.gate().unwrap();
    let v2 = LogicInstance::new(Identity::ephemeral(), h.registry.clone());
    rebind(&h.admin, &v1, &v2).unwrap();

    let key = StoreKey::derive("counter", "n", ValueKind::Uint);
    let err = gate
        .write(&v1.identity(), &key, Value::Uint(7))
        .unwrap_err();
    assert!(matches!(err, GateError::Unauthorized { .. }));
    assert_eq!(gate.owner(), v2.identity());
}

#[test]
fn rebind_requires_the_upgrader_role() {
    let h = harness();
    let v1 = deploy_v1(&h);
    let v2 = LogicInstance::new(Identity::ephemeral(), h.registry.clone());

    let outsider = Identity::ephemeral();
    let err = rebind(&outsider, &v1, &v2).unwrap_err();
    assert!(matches!(err, BindingError::MissingRole { .. }));

    // Nothing moved.
    assert_eq!(v1.binding_state(), BindingState::Bound);
    assert_eq!(v2.binding_state(), BindingState::Unbound);
    assert_eq!(v1.gate().unwrap().owner(), v1.identity());
}

#[test]
fn rebind_rejects_an_already_configured_successor() {
    let h = harness();
    let v1 = deploy_v1(&h);
    let v2 = deploy_v1(&h); // bound to its own store already

    let err = rebind(&h.admin, &v1, &v2).unwrap_err();
    assert!(matches!(err, BindingError::AlreadyConfigured));
    assert_eq!(v1.binding_state(), BindingState::Bound);
}

#[test]
fn configuration_cannot_be_skipped() {
    // complete_binding on an unbound instance fails: the state machine
    // never jumps Unbound -> Bound.
    let h = harness();
    let v2: LogicInstance<InMemoryStore> =
        LogicInstance::new(Identity::ephemeral(), h.registry.clone());
    let err = v2.complete_binding().unwrap_err();
    assert!(matches!(err, BindingError::NotConfigured));
}

#[test]
fn configured_but_unowned_instance_cannot_bind() {
    // v2 is configured with v1's store but ownership never moved; binding
    // completion must refuse.
    let h = harness();
    let v1 = deploy_v1(&h);
    let v2 = LogicInstance::new(Identity::ephemeral(), h.registry.clone());
    v2.bind_store(&h.admin, v1.gate().unwrap()).unwrap();

    let err = v2.complete_binding().unwrap_err();
    assert!(matches!(err, BindingError::StoreMismatch));
    assert_eq!(v2.binding_state(), BindingState::Configured);
}

#[test]
fn rebind_to_null_identity_successor_leaves_no_partial_state() {
    // A successor constructed with the null identity can never receive
    // ownership; the handover must fail before the successor is configured,
    // not strand it at Configured with the old generation still owning.
    let h = harness();
    let v1 = deploy_v1(&h);
    let v2 = LogicInstance::new(Identity::null(), h.registry.clone());

    let err = rebind(&h.admin, &v1, &v2).unwrap_err();
    assert!(matches!(err, BindingError::Gate(GateError::InvalidOwner)));

    assert_eq!(v2.binding_state(), BindingState::Unbound);
    assert_eq!(v1.binding_state(), BindingState::Bound);
    assert_eq!(v1.gate().unwrap().owner(), v1.identity());
}

#[test]
fn retired_instance_cannot_hand_over_twice() {
    let h = harness();
    let v1 = deploy_v1(&h);
    let v2 = LogicInstance::new(Identity::ephemeral(), h.registry.clone());
    rebind(&h.admin, &v1, &v2).unwrap();

    let v3 = LogicInstance::new(Identity::ephemeral(), h.registry.clone());
    let err = rebind(&h.admin, &v1, &v3).unwrap_err();
    assert!(matches!(err, BindingError::NotBound { .. }));
}

#[test]
fn chained_upgrades_preserve_state() {
    let h = harness();
    let v1 = deploy_v1(&h);
    let key = StoreKey::derive("ledger", "total", ValueKind::Uint);
    v1.write_value(&key, Value::Uint(10)).unwrap();

    let v2 = LogicInstance::new(Identity::ephemeral(), h.registry.clone());
    rebind(&h.admin, &v1, &v2).unwrap();
    v2.write_value(&key, Value::Uint(20)).unwrap();

    let v3 = LogicInstance::new(Identity::ephemeral(), h.registry.clone());
    rebind(&h.admin, &v2, &v3).unwrap();
    v3.write_value(&key, Value::Uint(30)).unwrap();

    assert_eq!(v3.read_value(&key).unwrap(), Value::Uint(30));
    // The same store reference travelled through every generation.
    assert_eq!(v1.store_reference(), v3.store_reference());
}

#[test]
fn handover_emits_exactly_one_transfer_event() {
    let h = harness();
    let v1 = deploy_v1(&h);
    let v2 = LogicInstance::new(Identity::ephemeral(), h.registry.clone());
    let events_before = h.log.len();

    rebind(&h.admin, &v1, &v2).unwrap();

    let transfers: Vec<_> = h.log.events()[events_before..]
        .iter()
        .filter(|e| matches!(e, StorageEvent::OwnershipTransferred { .. }))
        .cloned()
        .collect();
    assert_eq!(
        transfers,
        vec![StorageEvent::OwnershipTransferred {
            store: v2.store_reference().unwrap(),
            previous_owner: v1.identity(),
            new_owner: v2.identity(),
        }]
    );
}

#[test]
fn upgrade_over_a_persistent_store() {
    // The same protocol over the file-backed store: state written by v1
    // survives both the handover and a process-restart-style reopen.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.log");
    let h = harness();
    let key = StoreKey::derive("counter", "n", ValueKind::Uint);

    let v1 = Arc::new(LogicInstance::new(
        Identity::ephemeral(),
        h.registry.clone(),
    ));
    let gate = Arc::new(
        OwnershipGate::new(LogStore::open(&path).unwrap(), v1.identity(), h.log.clone())
            .unwrap(),
    );
    v1.bind_store(&h.admin, gate).unwrap();
    v1.complete_binding().unwrap();
    v1.write_value(&key, Value::Uint(1)).unwrap();

    let v2 = LogicInstance::new(Identity::ephemeral(), h.registry.clone());
    rebind(&h.admin, &v1, &v2).unwrap();
    v2.write_value(&key, Value::Uint(2)).unwrap();
    assert_eq!(v2.read_value(&key).unwrap(), Value::Uint(2));

    drop((v1, v2));
    let reopened = LogStore::open(&path).unwrap();
    assert_eq!(reopened.read_uint("counter", "n").unwrap(), 2);
}
