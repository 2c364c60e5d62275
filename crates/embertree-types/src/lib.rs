//! Foundation types for Embertree.
//!
//! Embertree presents the realtime-tree-database client object graph
//! (`database → reference → query → snapshot`) over a stateless JSON REST
//! API. This crate holds the leaf types every other Embertree crate builds
//! on.
//!
//! # Key Types
//!
//! - [`TreePath`] — Canonical, percent-encoded location of a node in the tree
//! - [`QueryParams`] — Ordering/pagination parameters attached to a read
//! - [`EventType`] — Subscription event kinds from the realtime client API
//! - [`server_value`] — Placeholders the remote store resolves at write time

pub mod event;
pub mod path;
pub mod query;
pub mod server_value;

pub use event::EventType;
pub use path::TreePath;
pub use query::QueryParams;
