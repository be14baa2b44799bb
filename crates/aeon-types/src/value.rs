use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// The primitive kinds a store entry can hold.
///
/// Each kind lives in its own key namespace: the same (namespace, name)
/// pair derives different [`StoreKey`](crate::StoreKey)s for different
/// kinds, so a `Uint` entry can never be read back as `Text`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    /// Unsigned 64-bit integer.
    Uint,
    /// Boolean flag.
    Bool,
    /// UTF-8 text.
    Text,
    /// Identity reference (owner addresses, logic instances).
    Identity,
}

impl ValueKind {
    /// Stable ASCII tag used for key derivation domain separation.
    pub(crate) fn tag(&self) -> &'static [u8] {
        match self {
            Self::Uint => b"uint",
            Self::Bool => b"bool",
            Self::Text => b"text",
            Self::Identity => b"identity",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uint => "uint",
            Self::Bool => "bool",
            Self::Text => "text",
            Self::Identity => "identity",
        };
        write!(f, "{s}")
    }
}

/// A stored value.
///
/// Absence is not a distinct state: reading a key that was never written
/// yields [`Value::zero`] for the key's kind, mirroring an always-addressable
/// flat address space. Writing the zero value is the closest thing to
/// deletion the store offers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Uint(u64),
    Bool(bool),
    Text(String),
    Identity(Identity),
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Uint(_) => ValueKind::Uint,
            Self::Bool(_) => ValueKind::Bool,
            Self::Text(_) => ValueKind::Text,
            Self::Identity(_) => ValueKind::Identity,
        }
    }

    /// The documented zero-value default for a kind: `0`, `false`, the empty
    /// string, or the null identity.
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Uint => Self::Uint(0),
            ValueKind::Bool => Self::Bool(false),
            ValueKind::Text => Self::Text(String::new()),
            ValueKind::Identity => Self::Identity(Identity::null()),
        }
    }

    /// Returns `true` if this is the zero value for its kind.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Uint(n) => *n == 0,
            Self::Bool(b) => !b,
            Self::Text(s) => s.is_empty(),
            Self::Identity(id) => id.is_null(),
        }
    }

    /// Unwrap as `u64`, or `None` if the kind differs.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(n) => Some(*n),
            _ => None,
        }
    }

    /// Unwrap as `bool`, or `None` if the kind differs.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Unwrap as `&str`, or `None` if the kind differs.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Unwrap as [`Identity`], or `None` if the kind differs.
    pub fn as_identity(&self) -> Option<Identity> {
        match self {
            Self::Identity(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Identity(id) => write!(f, "{id}"),
        }
    }
}
