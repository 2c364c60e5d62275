use embertree_types::TreePath;

use crate::client::RestClient;
use crate::reference::Reference;

/// Database facade mirroring the realtime client's `database()` handle.
#[derive(Clone)]
pub struct Database {
    client: RestClient,
}

impl Database {
    pub(crate) fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Reference to the node at `key` (the realtime client's `ref`). The key
    /// is sanitized into canonical form; an empty key yields the root.
    pub fn reference(&self, key: &str) -> Reference {
        Reference::new(self.client.clone(), TreePath::sanitize(key))
    }

    /// Reference to the root of the tree.
    pub fn root(&self) -> Reference {
        Reference::new(self.client.clone(), TreePath::root())
    }

    /// No-op: a stateless transport has no connection to resume.
    pub fn go_online(&self) {}

    /// No-op: a stateless transport has no connection to drop.
    pub fn go_offline(&self) {}
}
