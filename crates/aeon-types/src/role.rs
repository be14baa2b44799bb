use std::fmt;

use serde::{Deserialize, Serialize};

/// Named capability identifier for the role registry.
///
/// Roles are identified by a 32-byte value derived from a human-readable
/// name via BLAKE3. The all-zero id is reserved for the root role, which
/// administers every role that has not been given an explicit admin and
/// is its own admin (the base case of the rooted-forest invariant).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId {
    hash: [u8; 32],
}

impl RoleId {
    /// The root role. Self-administering; granted to the registry's creator
    /// at construction.
    pub const fn root() -> Self {
        Self { hash: [0u8; 32] }
    }

    /// Derive a role id from a human-readable name.
    pub fn named(name: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"aeon-role-v1:");
        hasher.update(name.as_bytes());
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Returns `true` if this is the root role.
    pub fn is_root(&self) -> bool {
        self.hash == [0u8; 32]
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Short identifier (first 8 hex characters, or `root`).
    pub fn short_id(&self) -> String {
        if self.is_root() {
            "role:root".to_string()
        } else {
            format!("role:{}", hex::encode(&self.hash[..4]))
        }
    }
}

impl fmt::Debug for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoleId({})", self.short_id())
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}
