//! HTTP transport seam for Embertree.
//!
//! The client core never talks to the network directly; it goes through the
//! [`Transport`] trait, which maps one [`RestRequest`] to one
//! [`RestResponse`]. [`HttpTransport`] is the reqwest-backed default.
//! Authorization tokens come from the separate [`IdentityProvider`] seam so
//! the host application's auth handle can be forwarded unchanged.

pub mod error;
pub mod http;
pub mod identity;
pub mod transport;

pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
pub use identity::{Anonymous, IdentityProvider, StaticToken};
pub use transport::{Method, RestRequest, RestResponse, Transport};
