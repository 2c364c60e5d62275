//! Embertree client core.
//!
//! Presents the realtime-tree-database client object graph
//! (`database → reference → query → snapshot`) over a stateless JSON REST
//! API, so code written against the socket-based client runs unmodified
//! while every operation is actually a single HTTP request.
//!
//! What the emulation gives up is documented, not hidden:
//!
//! - reads are deduplicated through a short-TTL cache, and writes never
//!   invalidate it — staleness is bounded only by the TTL;
//! - `on` delivers initial state for `value` subscriptions and silently
//!   ignores child-level change events, which need a push channel;
//! - connection management (`go_online`, `go_offline`, the connected probe)
//!   is answered locally.
//!
//! # Example
//!
//! ```no_run
//! use embertree_client::{AppConfig, EventType, RestClient};
//!
//! # async fn demo() -> embertree_client::DbResult<()> {
//! let client = RestClient::with_defaults(AppConfig::with_database_url(
//!     "https://db.example.test",
//! ));
//! let db = client.database();
//!
//! let posts = db.reference("posts");
//! posts.order_by_child("score").limit_to_first(10);
//! let snapshot = posts.once(EventType::Value, None, None).await?;
//! assert!(snapshot.exists() || snapshot.value().is_null());
//! # Ok(())
//! # }
//! ```

mod cache;
mod fetch;

pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod reference;
pub mod snapshot;

pub use client::RestClient;
pub use config::AppConfig;
pub use database::Database;
pub use error::{DbError, DbResult};
pub use reference::{CompleteCallback, ErrorCallback, Reference, SuccessCallback};
pub use snapshot::Snapshot;

// Re-export the seams and leaf types callers need to construct a client.
pub use embertree_transport::{
    Anonymous, HttpTransport, IdentityProvider, StaticToken, Transport,
};
pub use embertree_types::{server_value, EventType, QueryParams, TreePath};
