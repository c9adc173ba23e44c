// crates/apex-platform/src/pool.rs
// ============================================================================
// Module: Connection Pool
// Description: The only process-wide mutable state in the workspace (spec.md §5).
// Purpose: Hold platform connection handles keyed by org+user, with
//          single-flighted token refresh and LRU idle eviction.
// Dependencies: apex-contract, tokio
// ============================================================================

//! ## Overview
//! [`ConnectionPool`] replaces the "class-based service object with a shared
//! mutable cache" pattern (spec.md §9) with an explicit owner holding an
//! internal map, serialized per-handle. Refreshes are single-flighted: when
//! several callers ask for the same key while a refresh is already underway,
//! they all observe the one refresh's result rather than issuing their own.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use apex_contract::ApexError;
use tokio::sync::Mutex;
use tokio::sync::Notify;

/// Key identifying one pooled connection: org id plus user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    /// Organization identifier.
    pub org_id: String,
    /// User identifier the connection authenticates as.
    pub user_id: String,
}

/// A live access token and its expiration.
#[derive(Debug, Clone)]
pub struct TokenHandle {
    /// Current bearer access token.
    pub access_token: String,
    /// Wall-clock instant after which the token must be refreshed.
    pub expires_at: Instant,
}

/// Refreshes an access token for a [`ConnectionKey`].
///
/// Implementations perform the actual OAuth refresh call; this workspace
/// treats the refresh mechanism itself as an external collaborator (spec.md
/// §1's Non-goals exclude OAuth variants).
#[async_trait::async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Performs a refresh, returning a new token handle.
    async fn refresh(&self, key: &ConnectionKey) -> Result<TokenHandle, ApexError>;
}

struct Entry {
    token: TokenHandle,
    last_used: Instant,
    refresh_in_flight: Arc<Notify>,
}

/// Process-wide connection pool.
///
/// # Invariants
/// - Access to each entry is serialized per-key via the pool's internal mutex.
/// - Refreshes are single-flighted: only one in-flight refresh exists per key
///   at a time.
pub struct ConnectionPool {
    entries: Mutex<HashMap<ConnectionKey, Entry>>,
    refresher: Arc<dyn TokenRefresher>,
    refresh_buffer: Duration,
    min_idle: usize,
}

impl ConnectionPool {
    /// Creates a new pool. `refresh_buffer` is how far ahead of expiry a
    /// token is proactively refreshed. `min_idle` is the minimum number of
    /// idle entries kept around by [`ConnectionPool::evict_idle`].
    #[must_use]
    pub fn new(refresher: Arc<dyn TokenRefresher>, refresh_buffer: Duration, min_idle: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            refresher,
            refresh_buffer,
            min_idle: min_idle.max(1),
        }
    }

    /// Returns a live access token for `key`, refreshing it first if it is
    /// within the refresh buffer of expiring or does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns whatever [`TokenRefresher::refresh`] returns on failure.
    pub async fn acquire(&self, key: &ConnectionKey) -> Result<String, ApexError> {
        loop {
            let notify = {
                let mut entries = self.entries.lock().await;
                match entries.get_mut(key) {
                    Some(entry) if entry.token.expires_at > Instant::now() + self.refresh_buffer => {
                        entry.last_used = Instant::now();
                        return Ok(entry.token.access_token.clone());
                    }
                    Some(entry) => Arc::clone(&entry.refresh_in_flight),
                    None => {
                        let notify = Arc::new(Notify::new());
                        entries.insert(
                            key.clone(),
                            Entry {
                                token: TokenHandle { access_token: String::new(), expires_at: Instant::now() },
                                last_used: Instant::now(),
                                refresh_in_flight: Arc::clone(&notify),
                            },
                        );
                        notify
                    }
                }
            };

            if self.try_become_refresher(key).await? {
                let entries = self.entries.lock().await;
                let token = entries
                    .get(key)
                    .map(|entry| entry.token.access_token.clone())
                    .unwrap_or_default();
                notify.notify_waiters();
                return Ok(token);
            }

            notify.notified().await;
        }
    }

    /// Attempts to perform the refresh for `key` if no other caller already
    /// claimed it; returns `true` if this call performed the refresh.
    async fn try_become_refresher(&self, key: &ConnectionKey) -> Result<bool, ApexError> {
        let needs_refresh = {
            let entries = self.entries.lock().await;
            entries
                .get(key)
                .is_none_or(|entry| entry.token.expires_at <= Instant::now() + self.refresh_buffer)
        };
        if !needs_refresh {
            return Ok(false);
        }

        let token = self.refresher.refresh(key).await?;
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.token = token;
            entry.last_used = Instant::now();
        }
        Ok(true)
    }

    /// Evicts idle entries beyond `min_idle`, oldest-`last_used` first.
    pub async fn evict_idle(&self, idle_after: Duration) {
        let mut entries = self.entries.lock().await;
        if entries.len() <= self.min_idle {
            return;
        }
        let now = Instant::now();
        let mut keys_by_age: Vec<(ConnectionKey, Instant)> = entries
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_used) >= idle_after)
            .map(|(key, entry)| (key.clone(), entry.last_used))
            .collect();
        keys_by_age.sort_by_key(|(_, last_used)| *last_used);
        let evictable = entries.len().saturating_sub(self.min_idle);
        for (key, _) in keys_by_age.into_iter().take(evictable) {
            entries.remove(&key);
        }
    }

    /// Returns the number of pooled entries, for diagnostics and tests.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    struct CountingRefresher {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TokenRefresher for CountingRefresher {
        async fn refresh(&self, _key: &ConnectionKey) -> Result<TokenHandle, ApexError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(TokenHandle {
                access_token: "fresh-token".to_string(),
                expires_at: Instant::now() + Duration::from_secs(3600),
            })
        }
    }

    #[tokio::test]
    async fn concurrent_acquires_single_flight_the_refresh() {
        let refresher = Arc::new(CountingRefresher { calls: AtomicUsize::new(0) });
        let pool = Arc::new(ConnectionPool::new(refresher.clone(), Duration::from_secs(300), 1));
        let key = ConnectionKey { org_id: "00D1".to_string(), user_id: "0051".to_string() };

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = Arc::clone(&pool);
            let key = key.clone();
            handles.push(tokio::spawn(async move { pool.acquire(&key).await }));
        }
        for handle in handles {
            let token = handle.await.expect("task completes").expect("acquire succeeds");
            assert_eq!(token, "fresh-token");
        }
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn evict_idle_respects_min_idle_floor() {
        let refresher = Arc::new(CountingRefresher { calls: AtomicUsize::new(0) });
        let pool = ConnectionPool::new(refresher, Duration::from_secs(300), 1);
        for i in 0..3 {
            let key = ConnectionKey { org_id: "00D1".to_string(), user_id: format!("user{i}") };
            pool.acquire(&key).await.expect("acquire succeeds");
        }
        pool.evict_idle(Duration::from_secs(0)).await;
        assert_eq!(pool.len().await, 1);
    }
}
