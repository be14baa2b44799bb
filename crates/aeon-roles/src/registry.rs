use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use aeon_events::{EventSink, StorageEvent};
use aeon_types::{Identity, RoleId};

use crate::error::{RoleError, RoleResult};

/// Membership sets and admin edges, kept together behind one lock so every
/// mutating call sees and produces a consistent snapshot.
#[derive(Default)]
struct RegistryState {
    members: HashMap<RoleId, HashSet<Identity>>,
    admins: HashMap<RoleId, RoleId>,
}

impl RegistryState {
    /// The role required to grant or revoke `role`. Unconfigured roles
    /// default to the root role, which keeps the forest total without
    /// materializing an edge per role.
    fn role_admin(&self, role: RoleId) -> RoleId {
        self.admins.get(&role).copied().unwrap_or(RoleId::root())
    }

    fn has_role(&self, role: RoleId, identity: &Identity) -> bool {
        self.members
            .get(&role)
            .is_some_and(|set| set.contains(identity))
    }
}

/// Pure admin check: does `caller` hold the admin role configured for
/// `role` in this state? No side effects; separated from the mutation so
/// the decision logic is testable on its own.
fn authorize_admin(state: &RegistryState, caller: &Identity, role: RoleId) -> RoleResult<()> {
    let required = state.role_admin(role);
    if state.has_role(required, caller) {
        Ok(())
    } else {
        Err(RoleError::Unauthorized {
            caller: *caller,
            role,
            required,
        })
    }
}

/// Role-hierarchy access control registry.
///
/// Grants and revocations are gated on the caller holding the target role's
/// admin role; admin edges are rewired only by root holders, and only in
/// ways that keep the relation a rooted forest.
pub struct RoleRegistry {
    state: RwLock<RegistryState>,
    events: Arc<dyn EventSink>,
}

impl RoleRegistry {
    /// Construct a registry whose root role is held by `creator`.
    ///
    /// The root role administers itself; this is the base case every other
    /// role's admin chain terminates in.
    pub fn new(creator: Identity, events: Arc<dyn EventSink>) -> Self {
        let mut state = RegistryState::default();
        state.members.entry(RoleId::root()).or_default().insert(creator);
        state.admins.insert(RoleId::root(), RoleId::root());
        info!(creator = %creator, "role registry created; root granted to creator");
        Self {
            state: RwLock::new(state),
            events,
        }
    }

    /// Pure membership lookup. Never fails.
    pub fn has_role(&self, role: RoleId, identity: &Identity) -> bool {
        self.state
            .read()
            .expect("lock poisoned")
            .has_role(role, identity)
    }

    /// The admin role currently required to grant or revoke `role`.
    pub fn role_admin(&self, role: RoleId) -> RoleId {
        self.state.read().expect("lock poisoned").role_admin(role)
    }

    /// Number of identities currently holding `role`.
    pub fn member_count(&self, role: RoleId) -> usize {
        self.state
            .read()
            .expect("lock poisoned")
            .members
            .get(&role)
            .map_or(0, HashSet::len)
    }

    /// Add `identity` to `role`'s membership set.
    ///
    /// Fails with [`RoleError::Unauthorized`] unless `caller` holds the
    /// admin role configured for `role`. Idempotent: granting an
    /// already-held role is a no-op success and records no event.
    pub fn grant_role(
        &self,
        caller: &Identity,
        role: RoleId,
        identity: Identity,
    ) -> RoleResult<()> {
        let mut state = self.state.write().expect("lock poisoned");
        authorize_admin(&state, caller, role)?;

        let inserted = state.members.entry(role).or_default().insert(identity);
        drop(state);

        if inserted {
            debug!(role = %role, identity = %identity, by = %caller, "role granted");
            self.events.record(StorageEvent::RoleGranted {
                role,
                identity,
                granted_by: *caller,
            });
        }
        Ok(())
    }

    /// Remove `identity` from `role`'s membership set.
    ///
    /// Symmetric to [`grant_role`](Self::grant_role); idempotent if the
    /// identity does not hold the role.
    ///
    /// The registry does not prevent revoking the last root holder —
    /// consuming code must keep at least one.
    pub fn revoke_role(
        &self,
        caller: &Identity,
        role: RoleId,
        identity: Identity,
    ) -> RoleResult<()> {
        let mut state = self.state.write().expect("lock poisoned");
        authorize_admin(&state, caller, role)?;

        let removed = state
            .members
            .get_mut(&role)
            .is_some_and(|set| set.remove(&identity));
        drop(state);

        if removed {
            debug!(role = %role, identity = %identity, by = %caller, "role revoked");
            self.events.record(StorageEvent::RoleRevoked {
                role,
                identity,
                revoked_by: *caller,
            });
        }
        Ok(())
    }

    /// Set the admin role required to grant or revoke `role`.
    ///
    /// Restricted to root holders. Repeated calls overwrite the prior
    /// association. Rejects edges that would make a role its own non-root
    /// ancestor ([`RoleError::CycleRejected`]) and any rewiring of the root
    /// role itself ([`RoleError::RootAdminImmutable`]); rejected calls leave
    /// the state untouched.
    pub fn set_role_admin(
        &self,
        caller: &Identity,
        role: RoleId,
        admin_role: RoleId,
    ) -> RoleResult<()> {
        let mut state = self.state.write().expect("lock poisoned");

        if !state.has_role(RoleId::root(), caller) {
            return Err(RoleError::Unauthorized {
                caller: *caller,
                role,
                required: RoleId::root(),
            });
        }
        if role.is_root() {
            return Err(RoleError::RootAdminImmutable);
        }
        Self::check_acyclic(&state, role, admin_role)?;

        let previous_admin_role = state.role_admin(role);
        state.admins.insert(role, admin_role);
        drop(state);

        if previous_admin_role != admin_role {
            debug!(
                role = %role,
                previous = %previous_admin_role,
                new = %admin_role,
                by = %caller,
                "role admin changed"
            );
            self.events.record(StorageEvent::RoleAdminChanged {
                role,
                previous_admin_role,
                new_admin_role: admin_role,
                changed_by: *caller,
            });
        }
        Ok(())
    }

    /// Walk the admin chain upward from `admin_role`; if it passes through
    /// `role` before terminating at root, the proposed edge closes a cycle.
    fn check_acyclic(state: &RegistryState, role: RoleId, admin_role: RoleId) -> RoleResult<()> {
        let mut current = admin_role;
        let mut visited = HashSet::new();
        loop {
            if current == role {
                return Err(RoleError::CycleRejected { role, admin_role });
            }
            if current.is_root() || !visited.insert(current) {
                return Ok(());
            }
            current = state.role_admin(current);
        }
    }
}

impl std::fmt::Debug for RoleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().expect("lock poisoned");
        f.debug_struct("RoleRegistry")
            .field("role_count", &state.members.len())
            .field("admin_edges", &state.admins.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeon_events::{InMemoryEventLog, NullSink};

    fn registry_by(creator: Identity) -> RoleRegistry {
        RoleRegistry::new(creator, Arc::new(NullSink))
    }

    #[test]
    fn creator_holds_root_at_construction() {
        let creator = Identity::ephemeral();
        let registry = registry_by(creator);
        assert!(registry.has_role(RoleId::root(), &creator));
        assert_eq!(registry.member_count(RoleId::root()), 1);
    }

    #[test]
    fn root_is_self_administering() {
        let registry = registry_by(Identity::ephemeral());
        assert_eq!(registry.role_admin(RoleId::root()), RoleId::root());
    }

    #[test]
    fn unconfigured_role_defaults_to_root_admin() {
        let registry = registry_by(Identity::ephemeral());
        assert_eq!(registry.role_admin(RoleId::named("operator")), RoleId::root());
    }

    #[test]
    fn root_holder_can_grant_any_root_administered_role() {
        let creator = Identity::ephemeral();
        let registry = registry_by(creator);
        let operator = RoleId::named("operator");
        let d = Identity::ephemeral();

        registry.grant_role(&creator, operator, d).unwrap();
        assert!(registry.has_role(operator, &d));
    }

    #[test]
    fn non_admin_cannot_grant() {
        // Scenario from the access-control contract: C creates, grants
        // OPERATOR to D; D cannot grant OPERATOR to E, C can.
        let c = Identity::ephemeral();
        let d = Identity::ephemeral();
        let e = Identity::ephemeral();
        let registry = registry_by(c);
        let operator = RoleId::named("operator");

        registry.grant_role(&c, operator, d).unwrap();

        let err = registry.grant_role(&d, operator, e).unwrap_err();
        assert!(matches!(err, RoleError::Unauthorized { .. }));
        assert!(!registry.has_role(operator, &e));

        registry.grant_role(&c, operator, e).unwrap();
        assert!(registry.has_role(operator, &e));
    }

    #[test]
    fn grant_is_idempotent() {
        let creator = Identity::ephemeral();
        let log = Arc::new(InMemoryEventLog::new());
        let registry = RoleRegistry::new(creator, log.clone());
        let operator = RoleId::named("operator");
        let d = Identity::ephemeral();

        registry.grant_role(&creator, operator, d).unwrap();
        registry.grant_role(&creator, operator, d).unwrap();

        assert_eq!(registry.member_count(operator), 1);
        // Second grant changed nothing and recorded nothing.
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn revoke_is_idempotent() {
        let creator = Identity::ephemeral();
        let log = Arc::new(InMemoryEventLog::new());
        let registry = RoleRegistry::new(creator, log.clone());
        let operator = RoleId::named("operator");
        let d = Identity::ephemeral();

        registry.grant_role(&creator, operator, d).unwrap();
        registry.revoke_role(&creator, operator, d).unwrap();
        registry.revoke_role(&creator, operator, d).unwrap();

        assert!(!registry.has_role(operator, &d));
        assert_eq!(log.len(), 2); // one grant, one revoke
    }

    #[test]
    fn delegated_admin_chain() {
        let creator = Identity::ephemeral();
        let registry = registry_by(creator);
        let manager = RoleId::named("manager");
        let operator = RoleId::named("operator");
        let m = Identity::ephemeral();
        let o = Identity::ephemeral();

        registry.grant_role(&creator, manager, m).unwrap();
        registry.set_role_admin(&creator, operator, manager).unwrap();

        // The manager can now administer the operator role; root no longer
        // holds the configured admin role directly.
        registry.grant_role(&m, operator, o).unwrap();
        assert!(registry.has_role(operator, &o));

        let err = registry.grant_role(&creator, operator, Identity::ephemeral());
        assert!(matches!(err, Err(RoleError::Unauthorized { .. })));
    }

    #[test]
    fn set_role_admin_requires_root() {
        let creator = Identity::ephemeral();
        let registry = registry_by(creator);
        let outsider = Identity::ephemeral();
        let err = registry
            .set_role_admin(&outsider, RoleId::named("operator"), RoleId::named("manager"))
            .unwrap_err();
        assert!(matches!(err, RoleError::Unauthorized { .. }));
    }

    #[test]
    fn set_role_admin_overwrites_prior_association() {
        let creator = Identity::ephemeral();
        let registry = registry_by(creator);
        let operator = RoleId::named("operator");
        let a = RoleId::named("admin-a");
        let b = RoleId::named("admin-b");

        registry.set_role_admin(&creator, operator, a).unwrap();
        assert_eq!(registry.role_admin(operator), a);
        registry.set_role_admin(&creator, operator, b).unwrap();
        assert_eq!(registry.role_admin(operator), b);
    }

    #[test]
    fn self_admin_edge_is_a_cycle() {
        let creator = Identity::ephemeral();
        let registry = registry_by(creator);
        let operator = RoleId::named("operator");
        let err = registry
            .set_role_admin(&creator, operator, operator)
            .unwrap_err();
        assert!(matches!(err, RoleError::CycleRejected { .. }));
        // The rejected call changed nothing.
        assert_eq!(registry.role_admin(operator), RoleId::root());
    }

    #[test]
    fn two_role_cycle_is_rejected() {
        let creator = Identity::ephemeral();
        let registry = registry_by(creator);
        let a = RoleId::named("role-a");
        let b = RoleId::named("role-b");

        registry.set_role_admin(&creator, a, b).unwrap();
        let err = registry.set_role_admin(&creator, b, a).unwrap_err();
        assert!(matches!(err, RoleError::CycleRejected { .. }));
        assert_eq!(registry.role_admin(b), RoleId::root());
    }

    #[test]
    fn root_admin_edge_cannot_be_rewired() {
        let creator = Identity::ephemeral();
        let registry = registry_by(creator);
        let err = registry
            .set_role_admin(&creator, RoleId::root(), RoleId::named("coup"))
            .unwrap_err();
        assert!(matches!(err, RoleError::RootAdminImmutable));
    }

    #[test]
    fn last_root_holder_can_be_revoked() {
        // Deliberately permitted: preserving a root holder is the consuming
        // code's invariant, not the registry's.
        let creator = Identity::ephemeral();
        let registry = registry_by(creator);
        registry
            .revoke_role(&creator, RoleId::root(), creator)
            .unwrap();
        assert_eq!(registry.member_count(RoleId::root()), 0);
    }

    #[test]
    fn admin_change_event_carries_both_edges() {
        let creator = Identity::ephemeral();
        let log = Arc::new(InMemoryEventLog::new());
        let registry = RoleRegistry::new(creator, log.clone());
        let operator = RoleId::named("operator");
        let manager = RoleId::named("manager");

        registry.set_role_admin(&creator, operator, manager).unwrap();

        assert_eq!(
            log.events(),
            vec![StorageEvent::RoleAdminChanged {
                role: operator,
                previous_admin_role: RoleId::root(),
                new_admin_role: manager,
                changed_by: creator,
            }]
        );
    }
}
