use embertree_transport::{Method, RestRequest, RestResponse};
use embertree_types::{QueryParams, TreePath};
use serde_json::Value;
use tracing::debug;

use crate::client::RestClient;
use crate::error::{DbError, DbResult};
use crate::reference::Reference;
use crate::snapshot::Snapshot;

/// Probing this path on the realtime client reports live connection state.
/// A stateless transport can never be "connected", so reads of it are
/// answered locally with `false` and never hit the network.
pub(crate) const CONNECTED_PSEUDO_PATH: &str = "/.info/connected";

impl RestClient {
    pub(crate) fn fresh_reference(&self, path: &TreePath) -> Reference {
        Reference::new(self.clone(), path.clone())
    }

    /// Base + path + serialized parameters, with the auth token attached
    /// when the identity provider yields one. The caller passes the final
    /// parameter set; this is also the cache key for reads.
    async fn resolved_url(&self, path: &TreePath, mut params: QueryParams) -> DbResult<String> {
        if let Some(token) = self.shared.identity.id_token().await {
            params.set_auth(&token);
        }
        let base = self.shared.base_url()?;
        let query = params.serialize();
        if query.is_empty() {
            Ok(format!("{base}{}", path.json_path()))
        } else {
            Ok(format!("{base}{}?{query}", path.json_path()))
        }
    }

    /// One read, deduplicated through the request cache. Concurrent calls
    /// resolving to the same URL share a single transport request; a
    /// completed entry (success or failure) is replayed until its TTL.
    pub(crate) async fn fetch_snapshot(
        &self,
        path: &TreePath,
        params: &QueryParams,
    ) -> DbResult<Snapshot> {
        if path.as_str() == CONNECTED_PSEUDO_PATH {
            return Ok(Snapshot::new(
                self.fresh_reference(path),
                Value::Bool(false),
            ));
        }

        let mut params = params.clone();
        // Range/limit queries need an explicit ordering; default to by-key.
        // Checked before auth is attached so the token alone never triggers it.
        if !params.is_empty() && !params.has_order_by() {
            params.set_order_by_key();
        }
        let url = self.resolved_url(path, params).await?;

        let cell = self.shared.cache.entry(&url);
        cell.get_or_init(|| self.fetch_uncached(path, &url))
            .await
            .clone()
    }

    async fn fetch_uncached(&self, path: &TreePath, url: &str) -> DbResult<Snapshot> {
        debug!(path = %path, "tree read");
        let response = self
            .shared
            .transport
            .execute(RestRequest::new(Method::Get, url))
            .await?;
        if !response.is_success() {
            return Err(DbError::Http {
                status: response.status,
            });
        }
        let value: Value = serde_json::from_str(&response.body)
            .map_err(|e| DbError::Malformed(format!("read response: {e}")))?;
        Ok(Snapshot::new(self.fresh_reference(path), value))
    }

    /// One write. Writes bypass the request cache entirely: they neither
    /// consult nor invalidate it, so reads inside the TTL window may still
    /// observe the pre-write value.
    pub(crate) async fn execute_write(
        &self,
        path: &TreePath,
        params: &QueryParams,
        method: Method,
        body: Option<String>,
    ) -> DbResult<RestResponse> {
        let url = self.resolved_url(path, params.clone()).await?;
        debug!(path = %path, method = %method, "tree write");
        let response = self
            .shared
            .transport
            .execute(RestRequest { method, url, body })
            .await?;
        if !response.is_success() {
            return Err(DbError::Http {
                status: response.status,
            });
        }
        Ok(response)
    }
}
