use std::fmt;
use std::sync::{Arc, Mutex};

use embertree_transport::{Method, RestResponse};
use embertree_types::{EventType, QueryParams, TreePath};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::client::RestClient;
use crate::error::{DbError, DbResult};
use crate::snapshot::Snapshot;

/// Invoked with the snapshot when a read succeeds.
pub type SuccessCallback = Box<dyn FnOnce(&Snapshot) + Send>;
/// Invoked with the error when a read fails.
pub type ErrorCallback = Box<dyn FnOnce(&DbError) + Send>;
/// Invoked exactly once when a write completes: `None` on success, the
/// error on failure.
pub type CompleteCallback = Box<dyn FnOnce(Option<&DbError>) + Send>;

/// Body of a successful append-write: the server-generated child key.
#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

/// Handle identifying one node in the remote tree, plus the mutable query
/// parameters of the next read.
///
/// A reference's path never changes after creation; only its attached query
/// parameters do. Query modifiers mutate the shared state in place and
/// return `&Self`, so chained calls (`r.order_by_child("x").limit_to_first(10)`)
/// stay on one reference rather than producing copies. Clones share the
/// same query state. A reference with pending chained modifiers should be
/// treated as owned by a single logical caller at a time.
#[derive(Clone)]
pub struct Reference {
    client: RestClient,
    path: TreePath,
    query: Arc<Mutex<QueryParams>>,
}

impl Reference {
    pub(crate) fn new(client: RestClient, path: TreePath) -> Self {
        Self {
            client,
            path,
            query: Arc::new(Mutex::new(QueryParams::new())),
        }
    }

    /// Last path segment, or `None` at the root.
    pub fn key(&self) -> Option<&str> {
        self.path.key()
    }

    pub fn path(&self) -> &TreePath {
        &self.path
    }

    /// Reference one level up, computed per call with fresh query state.
    /// `None` at the root.
    pub fn parent(&self) -> Option<Reference> {
        self.path
            .parent()
            .map(|path| Reference::new(self.client.clone(), path))
    }

    /// Brand-new reference to a child node, starting with no query
    /// parameters.
    pub fn child(&self, name: &str) -> Reference {
        Reference::new(self.client.clone(), self.path.child(name))
    }

    fn with_params(&self, mutate: impl FnOnce(&mut QueryParams)) -> &Self {
        mutate(&mut self.query.lock().expect("query state mutex poisoned"));
        self
    }

    fn params(&self) -> QueryParams {
        self.query.lock().expect("query state mutex poisoned").clone()
    }

    // ---- Query modifiers ----

    pub fn order_by_value(&self) -> &Self {
        self.with_params(|p| p.set_order_by_value())
    }

    pub fn order_by_key(&self) -> &Self {
        self.with_params(|p| p.set_order_by_key())
    }

    pub fn order_by_child(&self, child: &str) -> &Self {
        self.with_params(|p| p.set_order_by_child(child))
    }

    pub fn limit_to_first(&self, n: u32) -> &Self {
        self.with_params(|p| p.set_limit_to_first(n))
    }

    pub fn limit_to_last(&self, n: u32) -> &Self {
        self.with_params(|p| p.set_limit_to_last(n))
    }

    pub fn start_after(&self, value: impl Into<Value>) -> &Self {
        self.with_params(|p| p.set_start_after(&value.into()))
    }

    pub fn end_before(&self, value: impl Into<Value>) -> &Self {
        self.with_params(|p| p.set_end_before(&value.into()))
    }

    // ---- Reads ----

    /// Read the node once, through the client's request cache.
    pub async fn get(&self) -> DbResult<Snapshot> {
        self.client.fetch_snapshot(&self.path, &self.params()).await
    }

    /// One-shot read in subscription clothing. Only [`EventType::Value`] is
    /// supported; any other event kind fails with an unsupported-event
    /// error, handed to `on_error` when present and returned either way.
    pub async fn once(
        &self,
        event: EventType,
        on_success: Option<SuccessCallback>,
        on_error: Option<ErrorCallback>,
    ) -> DbResult<Snapshot> {
        let result = match event {
            EventType::Value => self.get().await,
            other => Err(DbError::UnsupportedEvent {
                operation: "once",
                event: other,
            }),
        };
        match result {
            Ok(snapshot) => {
                if let Some(callback) = on_success {
                    callback(&snapshot);
                }
                Ok(snapshot)
            }
            Err(err) => {
                if let Some(callback) = on_error {
                    callback(&err);
                }
                Err(err)
            }
        }
    }

    /// Subscription emulation over one-shot fetches.
    ///
    /// [`EventType::Value`] performs a single read and delivers the initial
    /// state; the child-level change events are deliberate no-ops, since
    /// incremental updates need a persistent channel this transport does not
    /// provide. Unlike [`Reference::once`] this never returns an error —
    /// failures go to `on_error` when present and are otherwise logged.
    pub async fn on(
        &self,
        event: EventType,
        on_success: SuccessCallback,
        on_error: Option<ErrorCallback>,
    ) {
        match event {
            EventType::Value => match self.get().await {
                Ok(snapshot) => on_success(&snapshot),
                Err(err) => self.report_subscription_error(err, on_error),
            },
            EventType::ChildAdded | EventType::ChildChanged | EventType::ChildRemoved => {
                // Real-time child events; callers use `value` for initial state.
            }
            other => self.report_subscription_error(
                DbError::UnsupportedEvent {
                    operation: "on",
                    event: other,
                },
                on_error,
            ),
        }
    }

    fn report_subscription_error(&self, err: DbError, on_error: Option<ErrorCallback>) {
        match on_error {
            Some(callback) => callback(&err),
            None => error!(path = %self.path, error = %err, "database 'on' subscription failed"),
        }
    }

    /// No-op: no subscriptions exist to cancel.
    pub fn off(&self, _event: Option<EventType>, _callback: Option<SuccessCallback>) {}

    // ---- Writes ----
    //
    // None of these touch the request cache; a read inside the TTL window
    // may still observe the pre-write value.

    /// Full overwrite of the node.
    pub async fn set(
        &self,
        value: impl Serialize,
        on_complete: Option<CompleteCallback>,
    ) -> DbResult<()> {
        self.write(Method::Put, Self::encode(&value).map(Some), on_complete)
            .await
            .map(|_| ())
    }

    /// Append under a server-generated key; resolves to the new child
    /// reference.
    pub async fn push(
        &self,
        value: impl Serialize,
        on_complete: Option<CompleteCallback>,
    ) -> DbResult<Reference> {
        let response = self
            .write(Method::Post, Self::encode(&value).map(Some), on_complete)
            .await?;
        let generated: PushResponse = serde_json::from_str(&response.body)
            .map_err(|e| DbError::Malformed(format!("push response: {e}")))?;
        Ok(self.child(&generated.name))
    }

    /// Partial merge into the node's children.
    pub async fn update(
        &self,
        value: impl Serialize,
        on_complete: Option<CompleteCallback>,
    ) -> DbResult<()> {
        self.write(Method::Patch, Self::encode(&value).map(Some), on_complete)
            .await
            .map(|_| ())
    }

    /// Delete the node.
    pub async fn remove(&self, on_complete: Option<CompleteCallback>) -> DbResult<()> {
        self.write(Method::Delete, Ok(None), on_complete)
            .await
            .map(|_| ())
    }

    fn encode<T: Serialize>(value: &T) -> DbResult<String> {
        serde_json::to_string(value).map_err(|e| DbError::Serialization(e.to_string()))
    }

    /// Shared write path: run the request (or surface the encoding error),
    /// then honor the completion-callback contract exactly once.
    async fn write(
        &self,
        method: Method,
        body: DbResult<Option<String>>,
        on_complete: Option<CompleteCallback>,
    ) -> DbResult<RestResponse> {
        let outcome = match body {
            Ok(body) => {
                self.client
                    .execute_write(&self.path, &self.params(), method, body)
                    .await
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok(response) => {
                if let Some(callback) = on_complete {
                    callback(None);
                }
                Ok(response)
            }
            Err(err) => {
                if let Some(callback) = on_complete {
                    callback(Some(&err));
                }
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("path", &self.path.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{client_with, offline_client, MockTransport};
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn flag() -> (Arc<AtomicBool>, Arc<AtomicBool>) {
        let f = Arc::new(AtomicBool::new(false));
        (Arc::clone(&f), f)
    }

    #[test]
    fn modifiers_mutate_in_place() {
        let r = offline_client().database().reference("items");
        let q = r.order_by_child("x");
        let q2 = r.limit_to_first(5);
        // same identity: chained modifiers stay on one reference
        assert!(std::ptr::eq(q, q2));

        let mut expected = QueryParams::new();
        expected.set_order_by_child("x");
        expected.set_limit_to_first(5);
        assert_eq!(r.params(), expected);
    }

    #[test]
    fn clones_share_query_state() {
        let r = offline_client().database().reference("items");
        let clone = r.clone();
        clone.limit_to_last(3);
        let mut expected = QueryParams::new();
        expected.set_limit_to_last(3);
        assert_eq!(r.params(), expected);
    }

    #[test]
    fn child_starts_with_empty_query_state() {
        let r = offline_client().database().reference("items");
        r.order_by_value();
        assert!(r.child("a").params().is_empty());
    }

    #[test]
    fn parent_and_key() {
        let db = offline_client().database();
        let root = db.root();
        assert!(root.parent().is_none());
        assert_eq!(root.key(), None);

        let child = root.child("a");
        assert_eq!(child.parent().unwrap().key(), root.key());
        assert_eq!(child.key(), Some("a"));

        let nested = db.reference("a/b/c");
        assert_eq!(nested.parent().unwrap().path().as_str(), "/a/b");
    }

    #[tokio::test(start_paused = true)]
    async fn once_value_invokes_success_callback() {
        let transport = Arc::new(MockTransport::with_body("7"));
        let client = client_with(Arc::clone(&transport));
        let r = client.database().reference("n");

        let (seen, check) = flag();
        let snapshot = r
            .once(
                EventType::Value,
                Some(Box::new(move |s| {
                    assert_eq!(s.value(), &json!(7));
                    seen.store(true, Ordering::SeqCst);
                })),
                None,
            )
            .await
            .unwrap();
        assert!(check.load(Ordering::SeqCst));
        assert_eq!(snapshot.value(), &json!(7));
    }

    #[tokio::test(start_paused = true)]
    async fn once_null_value_does_not_exist() {
        let transport = Arc::new(MockTransport::with_body("null"));
        let client = client_with(transport);
        let snapshot = client
            .database()
            .reference("missing")
            .once(EventType::Value, None, None)
            .await
            .unwrap();
        assert!(!snapshot.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn once_child_event_is_unsupported() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(Arc::clone(&transport));
        let r = client.database().reference("n");

        let (seen, check) = flag();
        let err = r
            .once(
                EventType::ChildAdded,
                None,
                Some(Box::new(move |e| {
                    assert!(matches!(e, DbError::UnsupportedEvent { .. }));
                    seen.store(true, Ordering::SeqCst);
                })),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnsupportedEvent { operation: "once", .. }));
        assert!(check.load(Ordering::SeqCst));
        // never reached the transport
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn on_value_delivers_initial_state() {
        let transport = Arc::new(MockTransport::with_body("\"hello\""));
        let client = client_with(transport);
        let r = client.database().reference("greeting");

        let (seen, check) = flag();
        r.on(
            EventType::Value,
            Box::new(move |s| {
                assert_eq!(s.value(), &json!("hello"));
                seen.store(true, Ordering::SeqCst);
            }),
            None,
        )
        .await;
        assert!(check.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn on_child_events_are_noops() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(Arc::clone(&transport));
        let r = client.database().reference("n");

        let (seen, check) = flag();
        r.on(
            EventType::ChildAdded,
            Box::new(move |_| {
                seen.store(true, Ordering::SeqCst);
            }),
            None,
        )
        .await;
        // no callback, no error, no request
        assert!(!check.load(Ordering::SeqCst));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn on_unknown_event_routes_to_error_callback() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(transport);
        let r = client.database().reference("n");

        let (seen, check) = flag();
        r.on(
            EventType::ChildMoved,
            Box::new(|_| panic!("success callback must not run")),
            Some(Box::new(move |e| {
                assert!(matches!(e, DbError::UnsupportedEvent { operation: "on", .. }));
                seen.store(true, Ordering::SeqCst);
            })),
        )
        .await;
        assert!(check.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn on_failure_without_callback_is_swallowed() {
        tracing_subscriber::fmt().with_test_writer().try_init().ok();
        let transport = Arc::new(MockTransport::replying(500, ""));
        let client = client_with(transport);
        // must not panic or propagate; the failure is logged
        client
            .database()
            .reference("n")
            .on(EventType::Value, Box::new(|_| panic!("no snapshot")), None)
            .await;
    }

    #[test]
    fn off_is_a_noop() {
        let r = offline_client().database().reference("n");
        r.off(None, None);
        r.off(Some(EventType::Value), None);
    }

    #[tokio::test(start_paused = true)]
    async fn set_sends_put_and_completes() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(Arc::clone(&transport));
        let r = client.database().reference("users/alice");

        let (seen, check) = flag();
        r.set(
            json!({"age": 30}),
            Some(Box::new(move |err| {
                assert!(err.is_none());
                seen.store(true, Ordering::SeqCst);
            })),
        )
        .await
        .unwrap();
        assert!(check.load(Ordering::SeqCst));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Put);
        assert!(requests[0].url.ends_with("/users/alice.json"));
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"age":30}"#));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_set_reports_error_and_returns_it() {
        let transport = Arc::new(MockTransport::replying(403, ""));
        let client = client_with(transport);
        let r = client.database().reference("n");

        let (seen, check) = flag();
        let err = r
            .set(
                json!(1),
                Some(Box::new(move |err| {
                    assert!(matches!(err, Some(DbError::Http { status: 403 })));
                    seen.store(true, Ordering::SeqCst);
                })),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Http { status: 403 }));
        assert!(check.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn push_resolves_to_generated_child() {
        let transport = Arc::new(MockTransport::with_body(r#"{"name":"-Nabc123"}"#));
        let client = client_with(Arc::clone(&transport));
        let r = client.database().reference("posts");

        let child = r.push(json!({"title": "hi"}), None).await.unwrap();
        assert_eq!(child.key(), Some("-Nabc123"));
        assert_eq!(child.path().as_str(), "/posts/-Nabc123");

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Post);
    }

    #[tokio::test(start_paused = true)]
    async fn push_with_garbled_response_is_malformed() {
        let transport = Arc::new(MockTransport::with_body("{}"));
        let client = client_with(transport);
        let err = client
            .database()
            .reference("posts")
            .push(json!(1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Malformed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn update_sends_patch() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(Arc::clone(&transport));
        client
            .database()
            .reference("users/alice")
            .update(json!({"age": 31}), None)
            .await
            .unwrap();
        assert_eq!(transport.requests()[0].method, Method::Patch);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_sends_delete_without_body() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(Arc::clone(&transport));
        client
            .database()
            .reference("users/alice")
            .remove(None)
            .await
            .unwrap();
        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Delete);
        assert!(requests[0].body.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn writes_do_not_invalidate_cached_reads() {
        let transport = Arc::new(
            MockTransport::new()
                .queue(200, "\"before\"")
                .queue(200, "null") // the PUT
                .queue(200, "\"after\""),
        );
        let client = client_with(Arc::clone(&transport));
        let r = client.database().reference("n");

        let first = r.get().await.unwrap();
        assert_eq!(first.value(), &json!("before"));

        r.set(json!("after"), None).await.unwrap();

        // still inside the TTL window: the cached pre-write value wins
        let second = r.get().await.unwrap();
        assert_eq!(second.value(), &json!("before"));
        assert_eq!(transport.calls(), 2); // one GET, one PUT
    }
}
