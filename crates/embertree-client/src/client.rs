use std::sync::{Arc, OnceLock};

use embertree_transport::{Anonymous, HttpTransport, IdentityProvider, Transport};

use crate::cache::RequestCache;
use crate::config::AppConfig;
use crate::database::Database;
use crate::error::{DbError, DbResult};

/// State shared by every handle derived from one client: the forwarded app
/// config and identity provider, the transport, and the per-instance
/// request cache.
pub(crate) struct ClientShared {
    pub(crate) config: AppConfig,
    pub(crate) identity: Arc<dyn IdentityProvider>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) cache: RequestCache,
    base_url: OnceLock<String>,
}

impl ClientShared {
    /// The configured base location, without a trailing slash.
    ///
    /// Resolved lazily so a missing `database_url` only fails on first
    /// actual use of the database, never at client construction.
    pub(crate) fn base_url(&self) -> DbResult<&str> {
        if let Some(url) = self.base_url.get() {
            return Ok(url);
        }
        let configured = self
            .config
            .database_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or("");
        if configured.is_empty() {
            return Err(DbError::Configuration(
                "'database_url' option not provided".into(),
            ));
        }
        Ok(self.base_url.get_or_init(|| configured.to_string()))
    }
}

/// Entry point: wraps the host app's config and auth handle and yields the
/// [`Database`] facade. Every operation on the resulting object graph is one
/// HTTP request; there is no socket and no connection state.
///
/// Cloning is cheap and all clones share one request cache.
#[derive(Clone)]
pub struct RestClient {
    pub(crate) shared: Arc<ClientShared>,
}

impl RestClient {
    pub fn new(
        config: AppConfig,
        identity: Arc<dyn IdentityProvider>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            shared: Arc::new(ClientShared {
                config,
                identity,
                transport,
                cache: RequestCache::new(),
                base_url: OnceLock::new(),
            }),
        }
    }

    /// Anonymous identity over the default reqwest transport.
    pub fn with_defaults(config: AppConfig) -> Self {
        Self::new(config, Arc::new(Anonymous), Arc::new(HttpTransport::new()))
    }

    /// The host app options, forwarded unchanged.
    pub fn config(&self) -> &AppConfig {
        &self.shared.config
    }

    /// The identity provider, forwarded unchanged.
    pub fn auth(&self) -> Arc<dyn IdentityProvider> {
        Arc::clone(&self.shared.identity)
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.shared.transport)
    }

    pub fn database(&self) -> Database {
        Database::new(self.clone())
    }
}
