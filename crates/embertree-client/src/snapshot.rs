use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::reference::Reference;

/// Immutable result of one read: the value of a node at fetch time.
///
/// Cheap to clone — the value is shared behind an [`Arc`] because the same
/// snapshot is replayed to every caller coalesced onto one cached fetch.
#[derive(Clone)]
pub struct Snapshot {
    reference: Reference,
    value: Arc<Value>,
}

impl Snapshot {
    pub(crate) fn new(reference: Reference, value: Value) -> Self {
        Self {
            reference,
            value: Arc::new(value),
        }
    }

    /// Last segment of the node's path, or `None` at the root.
    pub fn key(&self) -> Option<&str> {
        self.reference.key()
    }

    /// A fresh reference to the node this snapshot was read from.
    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        Arc::try_unwrap(self.value).unwrap_or_else(|shared| (*shared).clone())
    }

    /// `true` iff the stored value is not null.
    pub fn exists(&self) -> bool {
        !self.value.is_null()
    }

    /// `true` iff the value is structured (an object or array), i.e. the
    /// node is interior rather than a leaf scalar.
    pub fn has_children(&self) -> bool {
        self.value.is_object() || self.value.is_array()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("path", &self.reference.path().as_str())
            .field("value", &self.value)
            .finish()
    }
}
