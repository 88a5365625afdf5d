//! Cache Module
//!
//! Key-value cache with expiration behind the `CacheBackend` trait. Each
//! request acquires its own `CacheConnection` and drops it when done.

mod entry;
mod memory;
mod redis;

use async_trait::async_trait;
use thiserror::Error;

pub use self::redis::RedisCache;
pub use entry::CacheEntry;
pub use memory::MemoryCache;

// == Cache Error Enum ==
/// Failures reported by a cache adapter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// The cache could not be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// A command was rejected or its reply was unusable
    #[error("Cache command failed: {0}")]
    Command(String),
}

/// Convenience Result type for cache adapters.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Hands out per-request cache connections.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn connect(&self) -> CacheResult<Box<dyn CacheConnection>>;
}

/// Commands available on an open cache connection.
#[async_trait]
pub trait CacheConnection: Send {
    /// Liveness probe.
    async fn ping(&mut self) -> CacheResult<()>;

    /// Returns the value, or None if the key is absent or expired.
    async fn get(&mut self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, expiring after `ttl_seconds`.
    async fn set_ex(&mut self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()>;

    /// Removes `key`. Deleting an absent key is not an error.
    async fn delete(&mut self, key: &str) -> CacheResult<()>;
}
