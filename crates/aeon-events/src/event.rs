use std::fmt;

use serde::{Deserialize, Serialize};

use aeon_types::{Identity, RoleId, StoreRef};

/// An observable administrative event.
///
/// Events carry the acting identity and the affected owner/role so that an
/// external monitor can reconstruct the full authority history of a store
/// without reading its entries. Value writes are deliberately not events:
/// only authority changes are observable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageEvent {
    /// Write authority over a store moved from one identity to another.
    OwnershipTransferred {
        store: StoreRef,
        previous_owner: Identity,
        new_owner: Identity,
    },
    /// An identity was added to a role's membership set.
    RoleGranted {
        role: RoleId,
        identity: Identity,
        granted_by: Identity,
    },
    /// An identity was removed from a role's membership set.
    RoleRevoked {
        role: RoleId,
        identity: Identity,
        revoked_by: Identity,
    },
    /// The admin role required to grant/revoke a role was changed.
    RoleAdminChanged {
        role: RoleId,
        previous_admin_role: RoleId,
        new_admin_role: RoleId,
        changed_by: Identity,
    },
}

impl StorageEvent {
    /// The identity that performed the recorded action.
    pub fn actor(&self) -> Identity {
        match self {
            Self::OwnershipTransferred { previous_owner, .. } => *previous_owner,
            Self::RoleGranted { granted_by, .. } => *granted_by,
            Self::RoleRevoked { revoked_by, .. } => *revoked_by,
            Self::RoleAdminChanged { changed_by, .. } => *changed_by,
        }
    }

    /// Short name of the event variant, for logging and filtering.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
            Self::RoleGranted { .. } => "RoleGranted",
            Self::RoleRevoked { .. } => "RoleRevoked",
            Self::RoleAdminChanged { .. } => "RoleAdminChanged",
        }
    }
}

impl fmt::Display for StorageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnershipTransferred {
                store,
                previous_owner,
                new_owner,
            } => write!(f, "OwnershipTransferred({store}: {previous_owner} -> {new_owner})"),
            Self::RoleGranted {
                role,
                identity,
                granted_by,
            } => write!(f, "RoleGranted({role} to {identity} by {granted_by})"),
            Self::RoleRevoked {
                role,
                identity,
                revoked_by,
            } => write!(f, "RoleRevoked({role} from {identity} by {revoked_by})"),
            Self::RoleAdminChanged {
                role,
                previous_admin_role,
                new_admin_role,
                changed_by,
            } => write!(
                f,
                "RoleAdminChanged({role}: {previous_admin_role} -> {new_admin_role} by {changed_by})"
            ),
        }
    }
}
