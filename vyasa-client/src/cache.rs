//! Keyed read cache
//!
//! Values are stored as JSON under a [`QueryKey`]. Concurrent fetches of the
//! same key wait on one shared load and all get its outcome, error included.
//! A failed load is forgotten so the next fetch starts over. Transient
//! failures of a load are retried with exponential backoff; mutations drop
//! keys by prefix.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;
use tokio::time::Instant;

use crate::error::{ClientError, ClientResult};

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Ordered key segments, e.g. `["students", <schoolId>, "class", <classId>]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(resource: impl Into<String>) -> Self {
        Self(vec![resource.into()])
    }

    pub fn push(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    /// Append a segment only when present
    pub fn push_opt(self, segment: Option<impl Into<String>>) -> Self {
        match segment {
            Some(segment) => self.push(segment),
            None => self,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

#[derive(Debug)]
struct Cached {
    value: Value,
    loaded_at: Instant,
}

type Slot = Arc<OnceCell<ClientResult<Cached>>>;

/// Read cache shared by every feature API of one client
#[derive(Debug, Clone)]
pub struct QueryCache {
    entries: Arc<DashMap<QueryKey, Slot>>,
    stale_after: Option<Duration>,
    retries: u32,
    base_delay: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(None, 3, Duration::from_secs(1))
    }
}

impl QueryCache {
    pub fn new(stale_after: Option<Duration>, retries: u32, base_delay: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            stale_after,
            retries,
            base_delay,
        }
    }

    /// Cached value for `key`, loading it when missing or stale
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, loader: F) -> ClientResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let slot = self.slot(&key);
        let outcome = slot
            .get_or_init(|| async {
                let value = self.retrying(&key, &loader).await?;
                tracing::debug!(key = %key, "Cached query result");
                Ok::<_, ClientError>(Cached {
                    value: serde_json::to_value(&value)?,
                    loaded_at: Instant::now(),
                })
            })
            .await;
        match outcome {
            Ok(cached) => Ok(serde_json::from_value(cached.value.clone())?),
            Err(err) => {
                self.entries.remove_if(&key, |_, current| Arc::ptr_eq(current, &slot));
                Err(err.clone())
            }
        }
    }

    /// Run an uncached read with the retry policy
    pub async fn retry<T, F, Fut>(&self, label: &str, loader: F) -> ClientResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        self.retrying(&QueryKey::new(label), &loader).await
    }

    /// Drop every key starting with `prefix`
    pub fn invalidate(&self, prefix: &QueryKey) {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        tracing::debug!(prefix = %prefix, dropped = before.saturating_sub(self.entries.len()), "Invalidated queries");
    }

    /// Drop everything
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries
            .get(key)
            .is_some_and(|slot| matches!(slot.get(), Some(Ok(c)) if !self.is_stale(c)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }

    fn is_stale(&self, cached: &Cached) -> bool {
        self.stale_after
            .is_some_and(|after| cached.loaded_at.elapsed() >= after)
    }

    /// Live slot for `key`; a stale or failed slot is replaced by an empty one
    fn slot(&self, key: &QueryKey) -> Slot {
        let slot = self.entries.entry(key.clone()).or_default().clone();
        let dead = match slot.get() {
            Some(Ok(cached)) => self.is_stale(cached),
            Some(Err(_)) => true,
            None => false,
        };
        if dead {
            self.entries.remove_if(key, |_, current| Arc::ptr_eq(current, &slot));
            return self.entries.entry(key.clone()).or_default().clone();
        }
        slot
    }

    async fn retrying<T, F, Fut>(&self, key: &QueryKey, loader: &F) -> ClientResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match loader().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        key = %key,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e.log_detail(),
                        "Read failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn key(parts: &[&str]) -> QueryKey {
        parts[1..]
            .iter()
            .fold(QueryKey::new(parts[0]), |k, p| k.push(*p))
    }

    #[test]
    fn test_backoff_is_capped() {
        let cache = QueryCache::new(None, 3, Duration::from_secs(1));
        assert_eq!(cache.backoff(0), Duration::from_secs(1));
        assert_eq!(cache.backoff(1), Duration::from_secs(2));
        assert_eq!(cache.backoff(4), Duration::from_secs(16));
        assert_eq!(cache.backoff(5), MAX_BACKOFF);
        assert_eq!(cache.backoff(40), MAX_BACKOFF);
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let cache = QueryCache::default();
        let calls = &AtomicU32::new(0);
        for _ in 0..3 {
            let value: Vec<String> = cache
                .fetch(key(&["holidays", "s1"]), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["Diwali".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(value, vec!["Diwali".to_string()]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_by_prefix() {
        let cache = QueryCache::default();
        for k in [key(&["students", "s1", "c1"]), key(&["students", "s1"]), key(&["teachers", "s1"])] {
            let _: u32 = cache.fetch(k, || async { Ok(1) }).await.unwrap();
        }
        cache.invalidate(&QueryKey::new("students"));
        assert!(!cache.contains(&key(&["students", "s1", "c1"])));
        assert!(!cache.contains(&key(&["students", "s1"])));
        assert!(cache.contains(&key(&["teachers", "s1"])));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried() {
        let cache = QueryCache::new(None, 3, Duration::from_millis(100));
        let calls = &AtomicU32::new(0);
        let value: u32 = cache
            .fetch(QueryKey::new("classes"), move || async move {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 => Err(ClientError::Timeout),
                    1 => Err(ClientError::Api {
                        status: StatusCode::SERVICE_UNAVAILABLE,
                        message: "down".into(),
                    }),
                    _ => Ok(7),
                }
            })
            .await
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_budget_exhausted() {
        let cache = QueryCache::new(None, 2, Duration::from_millis(10));
        let calls = &AtomicU32::new(0);
        let err = cache
            .retry("holidays", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(ClientError::Network("refused".into()))
            })
            .await
            .unwrap_err();
        assert!(err.is_network_error());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_not_retried() {
        let cache = QueryCache::default();
        let calls = &AtomicU32::new(0);
        let err = cache
            .fetch(QueryKey::new("students"), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(ClientError::Api {
                    status: StatusCode::FORBIDDEN,
                    message: "no".into(),
                })
            })
            .await
            .unwrap_err();
        assert!(err.is_permission_error());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!cache.contains(&QueryKey::new("students")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiters_share_a_failed_load() {
        let cache = QueryCache::new(None, 2, Duration::from_millis(10));
        let calls = &AtomicU32::new(0);
        let load = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err::<u32, _>(ClientError::Network("refused".into()))
        };

        let (a, b, c) = tokio::join!(
            cache.fetch(QueryKey::new("classes"), load),
            cache.fetch(QueryKey::new("classes"), load),
            cache.fetch(QueryKey::new("classes"), load),
        );
        for result in [a, b, c] {
            assert!(result.unwrap_err().is_network_error());
        }
        // One load: first attempt plus two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(cache.is_empty());

        // The failure is not cached
        let value: u32 = cache
            .fetch(QueryKey::new("classes"), || async { Ok(5) })
            .await
            .unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entries_reload() {
        let cache = QueryCache::new(Some(Duration::from_secs(5)), 0, Duration::from_secs(1));
        let calls = &AtomicU32::new(0);
        let load = move || async move { Ok(calls.fetch_add(1, Ordering::SeqCst)) };

        let first: u32 = cache.fetch(QueryKey::new("announcements"), load).await.unwrap();
        tokio::time::advance(Duration::from_secs(6)).await;
        let second: u32 = cache.fetch(QueryKey::new("announcements"), load).await.unwrap();
        assert_eq!((first, second), (0, 1));
    }
}
