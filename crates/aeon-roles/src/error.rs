use aeon_types::{Identity, RoleId};

/// Errors from role registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RoleError {
    /// The caller does not hold the admin role required for the operation.
    #[error("unauthorized: {caller} lacks admin role {required} for {role}")]
    Unauthorized {
        caller: Identity,
        role: RoleId,
        required: RoleId,
    },

    /// The proposed admin edge would make a role its own non-root ancestor.
    #[error("role cycle rejected: making {admin_role} the admin of {role} would close a cycle")]
    CycleRejected { role: RoleId, admin_role: RoleId },

    /// The root role's admin edge is fixed by the bootstrap and cannot be
    /// rewired.
    #[error("the root role is permanently self-administering")]
    RootAdminImmutable,
}

/// Result alias for registry operations.
pub type RoleResult<T> = Result<T, RoleError>;
