//! Typed view over one cache entry.
//!
//! A `QueryObserver` is what a mounted screen holds: it pins the current
//! `QueryKey`, keeps a subscription alive, and projects the type-erased
//! cache payload into `T`. With `keep_previous_data` enabled, switching keys
//! (pagination, filter change) reports `Pending` with the previous key's
//! data until the new fetch resolves, so lists do not flicker empty.

use crate::cache::{QueryCache, QueryKey, QueryOptions, QueryStatus, Subscription};
use crate::error::ClientError;
use std::future::Future;
use std::sync::Arc;

/// Typed projection of a cache snapshot.
pub struct TypedSnapshot<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<Arc<ClientError>>,
    /// True when `data` is carried over from the previous key while the
    /// current key is still pending.
    pub is_previous_data: bool,
}

impl<T> Clone for TypedSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_previous_data: self.is_previous_data,
        }
    }
}

impl<T> TypedSnapshot<T> {
    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_previous_data: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Pending && self.data.is_none()
    }
}

pub struct QueryObserver<T> {
    cache: QueryCache,
    options: QueryOptions,
    keep_previous_data: bool,
    subscription: Option<Subscription>,
    previous: Option<Arc<T>>,
}

impl<T: Send + Sync + 'static> QueryObserver<T> {
    pub fn new(cache: QueryCache) -> Self {
        Self {
            cache,
            options: QueryOptions::default(),
            keep_previous_data: false,
            subscription: None,
            previous: None,
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn keep_previous_data(mut self, keep: bool) -> Self {
        self.keep_previous_data = keep;
        self
    }

    pub fn key(&self) -> Option<&QueryKey> {
        self.subscription.as_ref().map(Subscription::key)
    }

    /// Point the observer at `key`, fetching if needed, and return the
    /// current typed snapshot. Switching keys drops the old subscription
    /// (aborting its fetch if this was the sole subscriber).
    pub fn observe<F, Fut>(&mut self, key: QueryKey, fetch_fn: F) -> TypedSnapshot<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let same_key = self.key() == Some(&key);
        if !same_key {
            if self.keep_previous_data {
                if let Some(data) = self.current_data() {
                    self.previous = Some(data);
                }
            }
            // Subscribe to the new key before releasing the old subscription
            // so an entry shared by both never drops to zero subscribers.
            let next = self.cache.subscribe(key.clone());
            self.subscription = Some(next);
        }
        self.cache.ensure(key, fetch_fn, self.options);
        self.snapshot()
    }

    /// Current typed snapshot without triggering a fetch.
    pub fn snapshot(&self) -> TypedSnapshot<T> {
        let Some(subscription) = &self.subscription else {
            return TypedSnapshot::idle();
        };
        let snapshot = subscription.snapshot();
        let typed = snapshot
            .data
            .clone()
            .and_then(|payload| payload.downcast::<T>().ok());
        match typed {
            Some(data) => TypedSnapshot {
                status: snapshot.status,
                data: Some(data),
                error: snapshot.error,
                is_previous_data: false,
            },
            None if self.keep_previous_data
                && snapshot.status == QueryStatus::Pending
                && self.previous.is_some() =>
            {
                TypedSnapshot {
                    status: QueryStatus::Pending,
                    data: self.previous.clone(),
                    error: None,
                    is_previous_data: true,
                }
            }
            None => TypedSnapshot {
                status: snapshot.status,
                data: None,
                error: snapshot.error,
                is_previous_data: false,
            },
        }
    }

    /// Wait until the observed entry changes status.
    pub async fn changed(&mut self) -> QueryStatus {
        match &mut self.subscription {
            Some(subscription) => subscription.changed().await,
            None => QueryStatus::Idle,
        }
    }

    fn current_data(&self) -> Option<Arc<T>> {
        self.subscription
            .as_ref()
            .and_then(|s| s.snapshot().data)
            .and_then(|payload| payload.downcast::<T>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn settle(observer: &mut QueryObserver<String>) {
        for _ in 0..200 {
            let status = observer.snapshot().status;
            if status == QueryStatus::Success || status == QueryStatus::Error {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("query did not settle");
    }

    fn page_key(page: u32) -> QueryKey {
        QueryKey::root("students").push("list").push(page)
    }

    fn page_fetch(page: u32, delay_ms: u64) -> impl Fn() -> futures_util::future::BoxFuture<'static, Result<String, ClientError>> + Send + Sync + 'static
    {
        move || {
            Box::pin(async move {
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Ok(format!("page {}", page))
            })
        }
    }

    #[tokio::test]
    async fn test_observe_reports_typed_data() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let mut observer: QueryObserver<String> = QueryObserver::new(cache);

        let snapshot = observer.observe(page_key(1), page_fetch(1, 0));
        assert!(snapshot.is_loading());

        settle(&mut observer).await;
        let snapshot = observer.snapshot();
        assert_eq!(snapshot.status, QueryStatus::Success);
        assert_eq!(snapshot.data.unwrap().as_str(), "page 1");
    }

    #[tokio::test]
    async fn test_key_change_without_keep_previous_goes_empty() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let mut observer: QueryObserver<String> = QueryObserver::new(cache);

        observer.observe(page_key(1), page_fetch(1, 0));
        settle(&mut observer).await;

        let snapshot = observer.observe(page_key(2), page_fetch(2, 50));
        assert_eq!(snapshot.status, QueryStatus::Pending);
        assert!(snapshot.data.is_none());
    }

    #[tokio::test]
    async fn test_keep_previous_data_bridges_page_change() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let mut observer: QueryObserver<String> =
            QueryObserver::new(cache).keep_previous_data(true);

        observer.observe(page_key(1), page_fetch(1, 0));
        settle(&mut observer).await;

        // Page change: pending status, but page 1 data stays visible.
        let snapshot = observer.observe(page_key(2), page_fetch(2, 50));
        assert_eq!(snapshot.status, QueryStatus::Pending);
        assert!(snapshot.is_previous_data);
        assert_eq!(snapshot.data.unwrap().as_str(), "page 1");

        settle(&mut observer).await;
        let snapshot = observer.snapshot();
        assert_eq!(snapshot.status, QueryStatus::Success);
        assert!(!snapshot.is_previous_data);
        assert_eq!(snapshot.data.unwrap().as_str(), "page 2");
    }

    #[tokio::test]
    async fn test_rapid_page_flips_resolve_to_last_page() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let mut observer: QueryObserver<String> =
            QueryObserver::new(cache.clone()).keep_previous_data(true);

        // Page 1 is slow; flip to page 2 before it resolves.
        observer.observe(page_key(1), page_fetch(1, 100));
        observer.observe(page_key(2), page_fetch(2, 10));

        settle(&mut observer).await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        let snapshot = observer.snapshot();
        assert_eq!(snapshot.data.unwrap().as_str(), "page 2");
        // Page 1's aborted fetch never landed.
        assert!(cache.snapshot(&page_key(1)).data.is_none());
    }
}
