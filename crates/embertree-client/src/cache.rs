use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::time::Instant;

use crate::error::DbResult;
use crate::snapshot::Snapshot;

/// Kept short to bound staleness: writes never invalidate entries, so the
/// TTL is the only limit on how old a cached read can be.
pub(crate) const FETCH_CACHE_TTL: Duration = Duration::from_millis(2_000);

/// Shared completion slot for one cache key. Concurrent callers race on
/// `get_or_init`; exactly one runs the fetch, the rest await its result.
pub(crate) type FetchCell = Arc<OnceCell<DbResult<Snapshot>>>;

struct CacheEntry {
    inserted_at: Instant,
    cell: FetchCell,
}

/// Short-lived read cache, scoped to one client instance.
///
/// Keys are fully resolved request URLs — path plus every query parameter,
/// including the injected default ordering and the auth token — so the same
/// path under different modifiers occupies different entries. Entries expire
/// unconditionally at the TTL whether the fetch succeeded or failed; expiry
/// never cancels an in-flight request.
pub(crate) struct RequestCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl RequestCache {
    pub(crate) fn new() -> Self {
        Self::with_ttl(FETCH_CACHE_TTL)
    }

    pub(crate) fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// The live completion cell for `url`, creating a fresh one when there is
    /// no entry or the existing entry has outlived the TTL. Expired entries
    /// are swept on the way through.
    pub(crate) fn entry(&self, url: &str) -> FetchCell {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);

        let entry = entries.entry(url.to_string()).or_insert_with(|| CacheEntry {
            inserted_at: now,
            cell: Arc::new(OnceCell::new()),
        });
        Arc::clone(&entry.cell)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }
}
