//! Process-wide cache of server query results.
//!
//! Every feature query is an instance of the same contract: a `QueryKey`
//! identifies one cached result; `ensure` registers interest and fetches in
//! the background when the entry is absent or stale; mutations mark matching
//! entries stale by key prefix. All writes to the entry map are funneled
//! through `ensure`, invalidation, and the fetch-completion path.

use crate::error::ClientError;
use chrono::Utc;
use futures_util::future::BoxFuture;
use schoolhouse_core::Timestamp;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;
use uuid::Uuid;

/// Type-erased query result. Typed access goes through `QueryObserver`.
pub type Payload = Arc<dyn Any + Send + Sync>;

type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, Result<Payload, ClientError>> + Send + Sync>;

/// One element of a query key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPart {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        KeyPart::Int(value)
    }
}

impl From<u32> for KeyPart {
    fn from(value: u32) -> Self {
        KeyPart::Int(value as i64)
    }
}

impl From<bool> for KeyPart {
    fn from(value: bool) -> Self {
        KeyPart::Bool(value)
    }
}

impl From<Uuid> for KeyPart {
    fn from(value: Uuid) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Str(s) => write!(f, "{}", s),
            KeyPart::Int(i) => write!(f, "{}", i),
            KeyPart::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Identity tuple for a cached server-state result. Two keys are equal iff
/// their parts are element-wise equal; the cache holds at most one entry
/// per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    pub fn root(entity: &str) -> Self {
        Self(vec![KeyPart::from(entity)])
    }

    pub fn push(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    /// Prefix match used by invalidation: `["students", "list", 1]` starts
    /// with `["students"]`.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len()
            && self.0.iter().zip(prefix.0.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

/// Lifecycle of a cache entry: `Idle -> Pending -> {Success, Error}`, with
/// re-entry to `Pending` on invalidation or parameter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Pending,
    Success,
    Error,
}

/// Snapshot of one cache entry handed to presentation. Errors are carried
/// in the `error` field, never thrown across the cache boundary.
#[derive(Clone)]
pub struct Snapshot {
    pub status: QueryStatus,
    pub data: Option<Payload>,
    pub error: Option<Arc<ClientError>>,
    pub is_stale: bool,
    pub fetched_at: Option<Timestamp>,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_stale: false,
            fetched_at: None,
        }
    }
}

/// Published whenever an entry changes status.
#[derive(Debug, Clone)]
pub struct CacheEvent {
    pub key: QueryKey,
    pub status: QueryStatus,
}

/// Per-call options for `ensure`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    /// Override the cache-wide staleness window.
    pub stale_time: Option<Duration>,
}

struct Entry {
    status: QueryStatus,
    data: Option<Payload>,
    error: Option<Arc<ClientError>>,
    stale: bool,
    fetched_at: Option<Timestamp>,
    /// Latest issued fetch sequence number; completions carrying an older
    /// number are discarded (last-fetch-wins).
    seq: u64,
    inflight: Option<AbortHandle>,
    subscribers: usize,
    fetcher: Option<Fetcher>,
}

impl Entry {
    fn new() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            stale: false,
            fetched_at: None,
            seq: 0,
            inflight: None,
            subscribers: 0,
            fetcher: None,
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_stale: self.stale,
            fetched_at: self.fetched_at,
        }
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        if self.stale || self.status != QueryStatus::Success {
            return false;
        }
        match self.fetched_at {
            Some(at) => match Utc::now().signed_duration_since(at).to_std() {
                Ok(age) => age < stale_time,
                // Clock skew put fetched_at in the future; treat as fresh.
                Err(_) => true,
            },
            None => false,
        }
    }
}

/// Shared handle to the query cache. Cheap to clone; all clones see the
/// same entries.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Mutex<HashMap<QueryKey, Entry>>>,
    events: broadcast::Sender<CacheEvent>,
    default_stale_time: Duration,
}

impl QueryCache {
    pub fn new(default_stale_time: Duration) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            events,
            default_stale_time,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Receiver for entry change events, independent of any one key.
    pub fn subscribe_events(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self, key: &QueryKey) -> Snapshot {
        self.lock()
            .get(key)
            .map(Entry::snapshot)
            .unwrap_or_else(Snapshot::empty)
    }

    /// Register interest in `key`. Spawns the fetch when the entry is absent
    /// or stale and returns the current snapshot immediately; the caller sees
    /// `Pending` (possibly with prior data) and is notified on completion.
    /// Concurrent calls for the same key share one in-flight fetch.
    pub fn ensure<T, F, Fut>(&self, key: QueryKey, fetch_fn: F, options: QueryOptions) -> Snapshot
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let fetcher: Fetcher = Arc::new(move || {
            let fut = fetch_fn();
            Box::pin(async move { fut.await.map(|value| Arc::new(value) as Payload) })
        });
        let stale_time = options.stale_time.unwrap_or(self.default_stale_time);

        let mut map = self.lock();
        let entry = map.entry(key.clone()).or_insert_with(Entry::new);
        entry.fetcher = Some(fetcher);
        if entry.inflight.is_some() || entry.is_fresh(stale_time) {
            return entry.snapshot();
        }
        self.start_fetch(&key, entry);
        entry.snapshot()
    }

    /// Mark every entry whose key begins with `prefix` stale. Entries with
    /// live subscribers refetch in the background; the rest refetch on next
    /// `ensure`. Prior data is retained while the refetch is pending.
    pub fn invalidate_prefix(&self, prefix: &QueryKey) {
        let mut map = self.lock();
        let matching: Vec<QueryKey> = map
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        tracing::debug!(prefix = %prefix, entries = matching.len(), "invalidating cache prefix");
        for key in matching {
            if let Some(entry) = map.get_mut(&key) {
                entry.stale = true;
                if entry.subscribers > 0 {
                    self.start_fetch(&key, entry);
                }
            }
        }
    }

    /// Drop every entry and abort in-flight fetches. Used on logout.
    pub fn clear(&self) {
        let mut map = self.lock();
        for entry in map.values_mut() {
            if let Some(handle) = entry.inflight.take() {
                handle.abort();
            }
        }
        map.clear();
    }

    /// Register a subscriber for `key`. Dropping the returned subscription
    /// unregisters; when the last subscriber for a key goes away, any
    /// in-flight fetch is aborted.
    pub fn subscribe(&self, key: QueryKey) -> Subscription {
        {
            let mut map = self.lock();
            map.entry(key.clone()).or_insert_with(Entry::new).subscribers += 1;
        }
        Subscription {
            cache: self.clone(),
            key,
            rx: self.events.subscribe(),
        }
    }

    fn unsubscribe(&self, key: &QueryKey) {
        let mut map = self.lock();
        if let Some(entry) = map.get_mut(key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            if entry.subscribers == 0 {
                if let Some(handle) = entry.inflight.take() {
                    handle.abort();
                    // A completion that escaped the abort must not land.
                    entry.seq += 1;
                    entry.status = if entry.data.is_some() {
                        QueryStatus::Success
                    } else {
                        QueryStatus::Idle
                    };
                }
            }
        }
    }

    /// Issue a new fetch for `key`. Supersedes any in-flight fetch: the old
    /// task is aborted and its sequence number retired.
    fn start_fetch(&self, key: &QueryKey, entry: &mut Entry) {
        let Some(fetcher) = entry.fetcher.clone() else {
            return;
        };
        if let Some(handle) = entry.inflight.take() {
            handle.abort();
        }
        entry.seq += 1;
        entry.status = QueryStatus::Pending;
        let seq = entry.seq;
        let cache = self.clone();
        let task_key = key.clone();
        tracing::debug!(key = %key, seq, "starting query fetch");
        let handle = tokio::spawn(async move {
            let result = (fetcher)().await;
            cache.apply_result(&task_key, seq, result);
        });
        entry.inflight = Some(handle.abort_handle());
        let _ = self.events.send(CacheEvent {
            key: key.clone(),
            status: QueryStatus::Pending,
        });
    }

    fn apply_result(&self, key: &QueryKey, seq: u64, result: Result<Payload, ClientError>) {
        let status = {
            let mut map = self.lock();
            let Some(entry) = map.get_mut(key) else {
                return;
            };
            if entry.seq != seq {
                // Superseded by a newer fetch for the same key.
                return;
            }
            entry.inflight = None;
            entry.fetched_at = Some(Utc::now());
            match result {
                Ok(payload) => {
                    entry.data = Some(payload);
                    entry.error = None;
                    entry.stale = false;
                    entry.status = QueryStatus::Success;
                }
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "query fetch failed");
                    entry.error = Some(Arc::new(err));
                    entry.status = QueryStatus::Error;
                }
            }
            entry.status
        };
        let _ = self.events.send(CacheEvent {
            key: key.clone(),
            status,
        });
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.lock().get(key).map(|e| e.subscribers).unwrap_or(0)
    }
}

/// Registered interest in one key. Presentation holds one per mounted query.
pub struct Subscription {
    cache: QueryCache,
    key: QueryKey,
    rx: broadcast::Receiver<CacheEvent>,
}

impl Subscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn snapshot(&self) -> Snapshot {
        self.cache.snapshot(&self.key)
    }

    /// Wait until this key's entry changes status.
    pub async fn changed(&mut self) -> QueryStatus {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.key == self.key => return event.status,
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => return self.snapshot().status,
                Err(broadcast::error::RecvError::Closed) => return self.snapshot().status,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cache.unsubscribe(&self.key);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(parts: &[&str]) -> QueryKey {
        let mut key = QueryKey::root(parts[0]);
        for part in &parts[1..] {
            key = key.push(*part);
        }
        key
    }

    fn cache() -> QueryCache {
        QueryCache::new(Duration::from_secs(60))
    }

    async fn settle(cache: &QueryCache, k: &QueryKey) {
        // Fetches resolve on the runtime; poll until the entry leaves Pending.
        for _ in 0..200 {
            let status = cache.snapshot(k).status;
            if status == QueryStatus::Success || status == QueryStatus::Error {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("query did not settle");
    }

    // ========================================================================
    // QueryKey Tests
    // ========================================================================

    #[test]
    fn test_key_equality_is_element_wise() {
        let a = key(&["students", "list"]).push(1u32);
        let b = QueryKey::root("students").push("list").push(1u32);
        assert_eq!(a, b);
        assert_ne!(a, key(&["students", "list"]).push(2u32));
    }

    #[test]
    fn test_key_prefix_matching() {
        let list = key(&["students", "list"]).push(1u32);
        assert!(list.starts_with(&QueryKey::root("students")));
        assert!(list.starts_with(&key(&["students", "list"])));
        assert!(!list.starts_with(&QueryKey::root("teachers")));
        assert!(!QueryKey::root("students").starts_with(&list));
    }

    #[test]
    fn test_key_display_joins_parts() {
        let k = QueryKey::root("students").push("list").push(2u32);
        assert_eq!(k.to_string(), "students/list/2");
    }

    // ========================================================================
    // Fetch Lifecycle Tests
    // ========================================================================

    #[tokio::test]
    async fn test_first_ensure_reports_pending_then_success() {
        let cache = cache();
        let k = key(&["students"]);

        let snapshot = cache.ensure(
            k.clone(),
            || async { Ok::<_, ClientError>(vec![1, 2, 3]) },
            QueryOptions::default(),
        );
        assert_eq!(snapshot.status, QueryStatus::Pending);
        assert!(snapshot.data.is_none());

        settle(&cache, &k).await;
        let snapshot = cache.snapshot(&k);
        assert_eq!(snapshot.status, QueryStatus::Success);
        let data = snapshot.data.unwrap().downcast::<Vec<i32>>().unwrap();
        assert_eq!(*data, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_error_lands_in_error_field() {
        let cache = cache();
        let k = key(&["students"]);

        cache.ensure(
            k.clone(),
            || async {
                Err::<i32, _>(ClientError::Server {
                    status: 500,
                    message: "boom".to_string(),
                })
            },
            QueryOptions::default(),
        );
        settle(&cache, &k).await;

        let snapshot = cache.snapshot(&k);
        assert_eq!(snapshot.status, QueryStatus::Error);
        assert!(snapshot.data.is_none());
        assert!(snapshot.error.unwrap().user_message().contains("boom"));
    }

    #[tokio::test]
    async fn test_fresh_entry_is_not_refetched() {
        let cache = cache();
        let k = key(&["students"]);
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            cache.ensure(
                k.clone(),
                move || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, ClientError>(42u64)
                    }
                },
                QueryOptions::default(),
            );
            settle(&cache, &k).await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_ensures_share_one_fetch() {
        let cache = cache();
        let k = key(&["students"]);
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let calls = calls.clone();
            cache.ensure(
                k.clone(),
                move || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        Ok::<_, ClientError>(1u8)
                    }
                },
                QueryOptions::default(),
            );
        }
        settle(&cache, &k).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // ========================================================================
    // Invalidation Tests
    // ========================================================================

    #[tokio::test]
    async fn test_invalidation_marks_stale_and_keeps_data() {
        let cache = cache();
        let k = key(&["students", "list"]);

        cache.ensure(
            k.clone(),
            || async { Ok::<_, ClientError>("page one".to_string()) },
            QueryOptions::default(),
        );
        settle(&cache, &k).await;

        // No subscribers: entry goes stale but is not refetched eagerly.
        cache.invalidate_prefix(&QueryKey::root("students"));
        let snapshot = cache.snapshot(&k);
        assert!(snapshot.is_stale);
        assert!(snapshot.data.is_some());
        assert_eq!(snapshot.status, QueryStatus::Success);
    }

    #[tokio::test]
    async fn test_invalidation_refetches_subscribed_entries() {
        let cache = cache();
        let k = key(&["students", "list"]);
        let calls = Arc::new(AtomicUsize::new(0));
        let _subscription = cache.subscribe(k.clone());

        let fetch_calls = calls.clone();
        cache.ensure(
            k.clone(),
            move || {
                let calls = fetch_calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ClientError>(n)
                }
            },
            QueryOptions::default(),
        );
        settle(&cache, &k).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate_prefix(&QueryKey::root("students"));
        settle(&cache, &k).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let snapshot = cache.snapshot(&k);
        assert!(!snapshot.is_stale);
        let data = snapshot.data.unwrap().downcast::<usize>().unwrap();
        assert_eq!(*data, 1);
    }

    #[tokio::test]
    async fn test_invalidation_does_not_touch_other_prefixes() {
        let cache = cache();
        let students = key(&["students", "list"]);
        let teachers = key(&["teachers", "list"]);

        cache.ensure(
            students.clone(),
            || async { Ok::<_, ClientError>(1u8) },
            QueryOptions::default(),
        );
        cache.ensure(
            teachers.clone(),
            || async { Ok::<_, ClientError>(2u8) },
            QueryOptions::default(),
        );
        settle(&cache, &students).await;
        settle(&cache, &teachers).await;

        cache.invalidate_prefix(&QueryKey::root("students"));

        assert!(cache.snapshot(&students).is_stale);
        assert!(!cache.snapshot(&teachers).is_stale);
    }

    #[tokio::test]
    async fn test_stale_entry_refetches_on_next_ensure() {
        let cache = cache();
        let k = key(&["settings"]);
        let calls = Arc::new(AtomicUsize::new(0));

        let make_fetch = |calls: Arc<AtomicUsize>| {
            move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ClientError>(())
                }
            }
        };

        cache.ensure(k.clone(), make_fetch(calls.clone()), QueryOptions::default());
        settle(&cache, &k).await;
        cache.invalidate_prefix(&QueryKey::root("settings"));

        cache.ensure(k.clone(), make_fetch(calls.clone()), QueryOptions::default());
        settle(&cache, &k).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    // ========================================================================
    // Ordering / Cancellation Tests
    // ========================================================================

    #[tokio::test]
    async fn test_superseding_fetch_wins_over_slow_predecessor() {
        let cache = cache();
        let k = key(&["students", "list"]);
        let _subscription = cache.subscribe(k.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        // First fetch is slow; invalidation supersedes it with a fast one.
        let fetch_calls = calls.clone();
        cache.ensure(
            k.clone(),
            move || {
                let calls = fetch_calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n == 0 {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                    Ok::<_, ClientError>(n)
                }
            },
            QueryOptions::default(),
        );
        cache.invalidate_prefix(&QueryKey::root("students"));
        settle(&cache, &k).await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        // The slow first result must not overwrite the superseding one.
        let snapshot = cache.snapshot(&k);
        let data = snapshot.data.unwrap().downcast::<usize>().unwrap();
        assert_eq!(*data, 1);
        assert_eq!(snapshot.status, QueryStatus::Success);
    }

    #[tokio::test]
    async fn test_dropping_last_subscriber_aborts_inflight() {
        let cache = cache();
        let k = key(&["students", "list"]);
        let completed = Arc::new(AtomicUsize::new(0));

        let subscription = cache.subscribe(k.clone());
        let fetch_completed = completed.clone();
        cache.ensure(
            k.clone(),
            move || {
                let completed = fetch_completed.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    completed.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ClientError>(())
                }
            },
            QueryOptions::default(),
        );

        drop(subscription);
        tokio::time::sleep(Duration::from_millis(120)).await;

        // Aborted fetch never wrote into the cache.
        assert_eq!(completed.load(Ordering::SeqCst), 0);
        let snapshot = cache.snapshot(&k);
        assert_eq!(snapshot.status, QueryStatus::Idle);
        assert!(snapshot.data.is_none());
    }

    #[tokio::test]
    async fn test_subscriber_count_tracks_subscriptions() {
        let cache = cache();
        let k = key(&["classes"]);

        let first = cache.subscribe(k.clone());
        let second = cache.subscribe(k.clone());
        assert_eq!(cache.subscriber_count(&k), 2);

        drop(first);
        assert_eq!(cache.subscriber_count(&k), 1);
        drop(second);
        assert_eq!(cache.subscriber_count(&k), 0);
    }

    #[tokio::test]
    async fn test_clear_empties_cache() {
        let cache = cache();
        let k = key(&["students"]);
        cache.ensure(
            k.clone(),
            || async { Ok::<_, ClientError>(5u8) },
            QueryOptions::default(),
        );
        settle(&cache, &k).await;

        cache.clear();

        let snapshot = cache.snapshot(&k);
        assert_eq!(snapshot.status, QueryStatus::Idle);
        assert!(snapshot.data.is_none());
    }

    #[tokio::test]
    async fn test_subscription_changed_observes_completion() {
        let cache = cache();
        let k = key(&["students"]);
        let mut subscription = cache.subscribe(k.clone());

        cache.ensure(
            k.clone(),
            || async { Ok::<_, ClientError>(7u8) },
            QueryOptions::default(),
        );

        let status = loop {
            let status = subscription.changed().await;
            if status != QueryStatus::Pending {
                break status;
            }
        };
        assert_eq!(status, QueryStatus::Success);
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
