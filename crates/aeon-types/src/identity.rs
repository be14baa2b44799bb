use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Material used to derive an [`Identity`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityMaterial {
    /// Genesis from a raw 32-byte seed.
    Seed([u8; 32]),
    /// Genesis from an external public key (32 bytes).
    PublicKey([u8; 32]),
    /// Derived identity from a parent identity and a label, for logic
    /// instances spawned by an administrator.
    Derived { parent: [u8; 32], label: String },
}

/// Caller and owner identity for Aeon Store operations.
///
/// An `Identity` is derived deterministically from [`IdentityMaterial`]
/// using BLAKE3; the same material always produces the same identity.
/// Every mutating entry point in the system compares the caller's identity
/// against an owner reference or a role membership set.
///
/// The all-zero identity is the null identity. It is a valid *value* (the
/// zero default for identity-typed store entries) but never a valid owner
/// or caller.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    hash: [u8; 32],
}

impl Identity {
    /// Derive an `Identity` from identity material.
    pub fn derive(material: &IdentityMaterial) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"aeon-identity-v1:");
        match material {
            IdentityMaterial::Seed(s) => {
                hasher.update(b"seed:");
                hasher.update(s);
            }
            IdentityMaterial::PublicKey(pk) => {
                hasher.update(b"pubkey:");
                hasher.update(pk);
            }
            IdentityMaterial::Derived { parent, label } => {
                hasher.update(b"derived:");
                hasher.update(parent);
                hasher.update(b":");
                hasher.update(label.as_bytes());
            }
        }
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Create an ephemeral (random) identity for tests and demos.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self::derive(&IdentityMaterial::Seed(bytes))
    }

    /// The null identity (all zero bytes). Never a valid owner.
    pub const fn null() -> Self {
        Self { hash: [0u8; 32] }
    }

    /// Returns `true` if this is the null identity.
    pub fn is_null(&self) -> bool {
        self.hash == [0u8; 32]
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("id:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from a hex string (64 hex characters, optional `id:` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("id:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr })
    }

    /// Create from a raw 32-byte hash. Use `derive()` for production code.
    pub fn from_raw(hash: [u8; 32]) -> Self {
        Self { hash }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.short_id())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}
