use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::value::ValueKind;

/// Fixed-width typed storage key.
///
/// A `StoreKey` is derived deterministically from a namespace string, a
/// human-readable name, and a [`ValueKind`], via a domain-separated BLAKE3
/// hash. The kind participates in the hash, so the same (namespace, name)
/// pair under two kinds yields two distinct keys. Two distinct
/// (namespace, name) pairs collide only by hash coincidence, which is
/// accepted as astronomically unlikely.
///
/// Keys are immutable once computed and carry their kind so the store can
/// reject writes of the wrong kind and synthesize the right zero default
/// on reads of absent entries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreKey {
    hash: [u8; 32],
    kind: ValueKind,
}

impl StoreKey {
    /// Derive a key from a namespace, a name, and a value kind.
    pub fn derive(namespace: &str, name: &str, kind: ValueKind) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"aeon-key-v1:");
        hasher.update(kind.tag());
        hasher.update(b":");
        hasher.update(namespace.as_bytes());
        hasher.update(b"/");
        hasher.update(name.as_bytes());
        Self {
            hash: *hasher.finalize().as_bytes(),
            kind,
        }
    }

    /// The value kind this key addresses.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Full hex-encoded string of the hash.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier (kind plus first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("{}:{}", self.kind, hex::encode(&self.hash[..4]))
    }

    /// Reconstruct a key from its raw hash and kind, e.g. when replaying a
    /// persisted log. Use `derive()` for production code.
    pub fn from_raw(hash: [u8; 32], kind: ValueKind) -> Self {
        Self { hash, kind }
    }

    /// Parse the hash part from a hex string (64 hex characters).
    pub fn from_hex(s: &str, kind: ValueKind) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr, kind })
    }
}

impl fmt::Debug for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreKey({})", self.short_id())
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}
