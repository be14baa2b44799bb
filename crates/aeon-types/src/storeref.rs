use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::Identity;

/// Queryable identifier for a deployed store instance.
///
/// Administrators and upgrade tooling use the `StoreRef` to locate a store
/// and re-target consuming logic at it during a handover. The reference is
/// minted once when the store's gate is constructed, from the creator's
/// identity plus a random nonce, so two deployments by the same creator
/// still get distinct references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreRef {
    hash: [u8; 32],
}

impl StoreRef {
    /// Mint a fresh store reference for a store created by `creator`.
    pub fn mint(creator: &Identity) -> Self {
        let mut nonce = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut nonce);
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"aeon-store-ref-v1:");
        hasher.update(creator.as_bytes());
        hasher.update(b":");
        hasher.update(&nonce);
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
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
        format!("store:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from a hex string (64 hex characters, optional `store:` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("store:").unwrap_or(s);
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
}

impl fmt::Debug for StoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreRef({})", self.short_id())
    }
}

impl fmt::Display for StoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_is_unique_per_call() {
        let creator = Identity::ephemeral();
        let r1 = StoreRef::mint(&creator);
        let r2 = StoreRef::mint(&creator);
        assert_ne!(r1, r2);
    }

    #[test]
    fn hex_roundtrip() {
        let r = StoreRef::mint(&Identity::ephemeral());
        let parsed = StoreRef::from_hex(&r.to_hex()).unwrap();
        assert_eq!(r, parsed);
    }

    #[test]
    fn hex_roundtrip_with_prefix() {
        let r = StoreRef::mint(&Identity::ephemeral());
        let parsed = StoreRef::from_hex(&format!("store:{}", r.to_hex())).unwrap();
        assert_eq!(r, parsed);
    }
}
