use std::time::Duration;

use moka::future::Cache;

/// Refresh-token ids that were rotated or logged out.
///
/// Entries expire together with the tokens they block, so the cache never
/// outgrows the set of still-valid refresh tokens.
#[derive(Clone)]
pub struct RevokedTokens {
    cache: Cache<String, ()>,
}

impl RevokedTokens {
    pub fn new(refresh_ttl_secs: usize) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(Duration::from_secs(refresh_ttl_secs as u64))
                .build(),
        }
    }

    pub async fn revoke(&self, jti: &str) {
        self.cache.insert(jti.to_string(), ()).await;
    }

    pub async fn is_revoked(&self, jti: &str) -> bool {
        self.cache.get(jti).await.is_some()
    }
}
