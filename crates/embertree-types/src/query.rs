use std::collections::BTreeMap;

use serde_json::Value;

use crate::path::encode_component;

/// Parameter names accepted by the REST read endpoint.
pub const ORDER_BY: &str = "orderBy";
pub const LIMIT_TO_FIRST: &str = "limitToFirst";
pub const LIMIT_TO_LAST: &str = "limitToLast";
pub const START_AFTER: &str = "startAfter";
pub const END_BEFORE: &str = "endBefore";
pub const AUTH: &str = "auth";

/// Ordering sentinels understood by the REST API.
const ORDER_BY_KEY: &str = "\"$key\"";
const ORDER_BY_VALUE: &str = "\"$value\"";

/// Mutable request descriptor attached to a reference: the ordering and
/// pagination parameters of the next read, plus the auth token when one is
/// attached at fetch time.
///
/// Parameters are kept in a [`BTreeMap`] so [`QueryParams::serialize`] is
/// deterministic — the serialized form participates in request-cache keys,
/// and two parameter sets with the same content must produce the same key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<&'static str, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn has_order_by(&self) -> bool {
        self.params.contains_key(ORDER_BY)
    }

    /// Order children by their value.
    pub fn set_order_by_value(&mut self) {
        self.params.insert(ORDER_BY, ORDER_BY_VALUE.into());
    }

    /// Order children by key. Also injected as the default ordering when a
    /// range/limit parameter is present without an explicit `orderBy`.
    pub fn set_order_by_key(&mut self) {
        self.params.insert(ORDER_BY, ORDER_BY_KEY.into());
    }

    /// Order children by the value of a named child field. The REST API
    /// expects the field name JSON-quoted.
    pub fn set_order_by_child(&mut self, child: &str) {
        self.params.insert(ORDER_BY, format!("\"{child}\""));
    }

    pub fn set_limit_to_first(&mut self, n: u32) {
        self.params.insert(LIMIT_TO_FIRST, n.to_string());
    }

    pub fn set_limit_to_last(&mut self, n: u32) {
        self.params.insert(LIMIT_TO_LAST, n.to_string());
    }

    /// Start the range strictly after `value` (JSON-encoded on the wire).
    pub fn set_start_after(&mut self, value: &Value) {
        self.params.insert(START_AFTER, value.to_string());
    }

    /// End the range strictly before `value` (JSON-encoded on the wire).
    pub fn set_end_before(&mut self, value: &Value) {
        self.params.insert(END_BEFORE, value.to_string());
    }

    pub fn set_auth(&mut self, token: &str) {
        self.params.insert(AUTH, token.to_string());
    }

    /// Serialize to a query string (`a=1&b=2`, no leading `?`), empty when no
    /// parameter is set. Keys appear in sorted order; values are
    /// percent-encoded.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.params {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(name);
            out.push('=');
            out.push_str(&encode_component(value));
        }
        out
    }
}
