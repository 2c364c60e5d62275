//! Placeholders resolved by the remote store at write time.

use serde_json::{json, Value};

/// Placeholder the store replaces with its own clock when the write is
/// applied. Use instead of a client-side timestamp when server time is the
/// source of truth.
pub fn timestamp() -> Value {
    json!({ ".sv": "timestamp" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_sentinel_shape() {
        let v = timestamp();
        assert_eq!(v, json!({ ".sv": "timestamp" }));
        assert_eq!(v[".sv"], json!("timestamp"));
    }
}
