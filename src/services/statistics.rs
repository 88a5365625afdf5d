//! Cached system statistics
//!
//! Read path: cache-aside on a single well-known key. Write path: the key is
//! dropped after every successful user creation. Staleness is bounded by the
//! TTL and by the next creation, whichever comes first.

use tracing::{debug, warn};

use crate::cache::{CacheBackend, CacheConnection};
use crate::models::SystemStatistics;
use crate::store::{StoreResult, UserStore};

/// Cache key holding the serialized snapshot.
pub const STATISTICS_CACHE_KEY: &str = "system_statistics";

/// Lifetime of a cached snapshot in seconds.
pub const STATISTICS_TTL_SECS: u64 = 300;

/// Returns the cached snapshot, or computes, caches and returns a fresh one.
///
/// Cache failures are logged and treated as a miss. Only a store failure
/// fails the call.
pub async fn load_statistics(
    store: &dyn UserStore,
    cache: &mut dyn CacheConnection,
) -> StoreResult<SystemStatistics> {
    match cache.get(STATISTICS_CACHE_KEY).await {
        Ok(Some(raw)) => match SystemStatistics::from_json(&raw) {
            Ok(stats) => {
                debug!("Statistics served from cache");
                return Ok(stats);
            }
            Err(e) => warn!("Discarding unreadable cached statistics: {}", e),
        },
        Ok(None) => debug!("Statistics cache miss"),
        Err(e) => warn!("Error reading statistics cache: {}", e),
    }

    let stats = SystemStatistics::fresh(store.count_users().await?);

    match stats.to_json() {
        Ok(payload) => {
            if let Err(e) = cache
                .set_ex(STATISTICS_CACHE_KEY, &payload, STATISTICS_TTL_SECS)
                .await
            {
                warn!("Error writing statistics cache: {}", e);
            }
        }
        Err(e) => warn!("Error serializing statistics: {}", e),
    }

    Ok(stats)
}

/// Drops the cached snapshot. Best-effort: failures are only logged.
pub async fn invalidate_statistics(cache: &dyn CacheBackend) {
    let result = match cache.connect().await {
        Ok(mut conn) => conn.delete(STATISTICS_CACHE_KEY).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => debug!("Statistics cache invalidated"),
        Err(e) => warn!("Could not invalidate statistics cache: {}", e),
    }
}
