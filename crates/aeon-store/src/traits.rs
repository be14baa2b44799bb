use aeon_types::{Identity, StoreKey, Value, ValueKind};

use crate::error::{StoreError, StoreResult};

/// Flat typed key-value store.
///
/// All implementations must satisfy these invariants:
/// - Reads of never-written keys return the zero value for the key's kind;
///   absence is not an error.
/// - A write whose value kind differs from the key's kind fails with
///   [`StoreError::KindMismatch`] before any state change.
/// - Each write is atomic with respect to its single key and last-write-wins.
/// - The store performs no access control — gating belongs to the layer
///   above.
/// - All I/O errors are propagated, never silently ignored.
pub trait TypedStore: Send + Sync {
    /// Write a value under a derived key.
    fn write(&self, key: &StoreKey, value: Value) -> StoreResult<()>;

    /// Read the value under a key, or the kind's zero value if absent.
    fn read(&self, key: &StoreKey) -> StoreResult<Value>;

    /// Check the value kind before any backend touch.
    ///
    /// Backends call this at the top of `write`; a mismatch leaves the
    /// store untouched.
    fn check_kind(&self, key: &StoreKey, value: &Value) -> StoreResult<()> {
        if value.kind() != key.kind() {
            return Err(StoreError::KindMismatch {
                key: *key,
                expected: key.kind(),
                actual: value.kind(),
            });
        }
        Ok(())
    }

    // Typed convenience helpers. Each derives the key from (namespace, name)
    // and delegates; reads unwrap the kind the key guarantees.

    fn write_uint(&self, namespace: &str, name: &str, value: u64) -> StoreResult<()> {
        let key = StoreKey::derive(namespace, name, ValueKind::Uint);
        self.write(&key, Value::Uint(value))
    }

    fn read_uint(&self, namespace: &str, name: &str) -> StoreResult<u64> {
        let key = StoreKey::derive(namespace, name, ValueKind::Uint);
        Ok(self.read(&key)?.as_uint().unwrap_or(0))
    }

    fn write_bool(&self, namespace: &str, name: &str, value: bool) -> StoreResult<()> {
        let key = StoreKey::derive(namespace, name, ValueKind::Bool);
        self.write(&key, Value::Bool(value))
    }

    fn read_bool(&self, namespace: &str, name: &str) -> StoreResult<bool> {
        let key = StoreKey::derive(namespace, name, ValueKind::Bool);
        Ok(self.read(&key)?.as_bool().unwrap_or(false))
    }

    fn write_text(&self, namespace: &str, name: &str, value: &str) -> StoreResult<()> {
        let key = StoreKey::derive(namespace, name, ValueKind::Text);
        self.write(&key, Value::Text(value.to_string()))
    }

    fn read_text(&self, namespace: &str, name: &str) -> StoreResult<String> {
        let key = StoreKey::derive(namespace, name, ValueKind::Text);
        match self.read(&key)? {
            Value::Text(s) => Ok(s),
            _ => Ok(String::new()),
        }
    }

    fn write_identity(&self, namespace: &str, name: &str, value: Identity) -> StoreResult<()> {
        let key = StoreKey::derive(namespace, name, ValueKind::Identity);
        self.write(&key, Value::Identity(value))
    }

    fn read_identity(&self, namespace: &str, name: &str) -> StoreResult<Identity> {
        let key = StoreKey::derive(namespace, name, ValueKind::Identity);
        Ok(self.read(&key)?.as_identity().unwrap_or(Identity::null()))
    }
}
