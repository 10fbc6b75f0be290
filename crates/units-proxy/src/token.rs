//! Access token cache.
//!
//! One token is held until its `expires_in` runs out. Refreshes are
//! serialized: concurrent callers that miss the cache wait on the same lock
//! and reuse the token the first one obtained. A failed refresh leaves the
//! cache empty so the next call tries again.

use crate::error::ProxyError;
use serde::Deserialize;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Successful OAuth token response. Other fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Lifetime in seconds. Some orgs omit it; the token is then cached
    /// for [`DEFAULT_TOKEN_LIFETIME`].
    #[serde(default)]
    pub expires_in: Option<u64>,
}

pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token if it is still valid at `now`, otherwise
    /// calls `refresh` and caches what it returns.
    pub async fn get_or_refresh<F, Fut>(&self, now: Instant, refresh: F) -> Result<String, ProxyError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TokenGrant, ProxyError>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(cached) = slot.as_ref() {
            if now < cached.expires_at {
                return Ok(cached.access_token.clone());
            }
            tracing::debug!("Cached access token expired");
        }
        *slot = None;

        let grant = refresh().await?;
        let lifetime = grant
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);
        *slot = Some(CachedToken {
            access_token: grant.access_token.clone(),
            expires_at: now + lifetime,
        });
        tracing::info!(lifetime_secs = lifetime.as_secs(), "Obtained new access token");
        Ok(grant.access_token)
    }

    /// Drops the cached token, e.g. after the CRM rejected it.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn grant(token: &str, secs: u64) -> TokenGrant {
        TokenGrant {
            access_token: token.to_string(),
            expires_in: Some(secs),
        }
    }

    #[tokio::test]
    async fn reuses_token_until_expiry() {
        let cache = TokenCache::new();
        let calls = AtomicUsize::new(0);
        let t0 = Instant::now();

        for offset in [0, 10, 59] {
            let token = cache
                .get_or_refresh(t0 + Duration::from_secs(offset), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(grant("tok-1", 60))
                })
                .await
                .unwrap();
            assert_eq!(token, "tok-1");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let token = cache
            .get_or_refresh(t0 + Duration::from_secs(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(grant("tok-2", 60))
            })
            .await
            .unwrap();
        assert_eq!(token, "tok-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_refresh_leaves_cache_empty() {
        let cache = TokenCache::new();
        let t0 = Instant::now();

        let err = cache
            .get_or_refresh(t0, || async { Err(ProxyError::Auth("invalid_grant".into())) })
            .await;
        assert!(matches!(err, Err(ProxyError::Auth(_))));

        let token = cache
            .get_or_refresh(t0, || async { Ok(grant("tok", 60)) })
            .await
            .unwrap();
        assert_eq!(token, "tok");
    }

    #[tokio::test]
    async fn expired_token_is_dropped_even_if_refresh_fails() {
        let cache = TokenCache::new();
        let t0 = Instant::now();
        cache
            .get_or_refresh(t0, || async { Ok(grant("old", 1)) })
            .await
            .unwrap();

        let later = t0 + Duration::from_secs(5);
        assert!(cache
            .get_or_refresh(later, || async { Err(ProxyError::Auth("down".into())) })
            .await
            .is_err());

        let calls = AtomicUsize::new(0);
        cache
            .get_or_refresh(later, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(grant("new", 60))
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_misses_refresh_once() {
        let cache = Arc::new(TokenCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let t0 = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_refresh(t0, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        Ok(grant("shared", 60))
                    })
                    .await
            }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap(), "shared");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_expires_in_uses_default_lifetime() {
        let cache = TokenCache::new();
        let t0 = Instant::now();
        cache
            .get_or_refresh(t0, || async {
                Ok(TokenGrant {
                    access_token: "tok".into(),
                    expires_in: None,
                })
            })
            .await
            .unwrap();
        let token = cache
            .get_or_refresh(t0 + Duration::from_secs(3600), || async {
                Err(ProxyError::Auth("should not be called".into()))
            })
            .await
            .unwrap();
        assert_eq!(token, "tok");
    }
}
