//! In-memory cache backend
//!
//! HashMap storage with per-entry expiration. Substitute for Redis in tests
//! and local runs; expired entries are dropped on read and by the background
//! sweep in `tasks::cleanup`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheBackend, CacheConnection, CacheEntry, CacheError, CacheResult};

// == Memory Cache ==
/// `CacheBackend` holding entries in process memory.
///
/// Clones share the same entries and failure switches.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    reachable: Arc<AtomicBool>,
    commands_failing: Arc<AtomicBool>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            reachable: Arc::new(AtomicBool::new(true)),
            commands_failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulates the cache server going down. Connecting fails while unreachable.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Simulates a server that accepts connections but fails every command.
    pub fn set_commands_failing(&self, failing: bool) {
        self.commands_failing.store(failing, Ordering::SeqCst);
    }

    /// Reads a value directly, bypassing the failure switches.
    pub async fn peek(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    /// Writes a raw value directly, bypassing the failure switches.
    pub async fn insert_raw(&self, key: &str, value: &str, ttl_seconds: Option<u64>) {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), CacheEntry::new(value.to_string(), ttl_seconds));
    }

    /// Removes all expired entries, returning how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn connect(&self) -> CacheResult<Box<dyn CacheConnection>> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("connection refused".to_string()));
        }
        Ok(Box::new(MemoryConnection {
            cache: self.clone(),
        }))
    }
}

struct MemoryConnection {
    cache: MemoryCache,
}

impl MemoryConnection {
    fn check(&self) -> CacheResult<()> {
        if !self.cache.reachable.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("connection reset".to_string()));
        }
        if self.cache.commands_failing.load(Ordering::SeqCst) {
            return Err(CacheError::Command("command rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheConnection for MemoryConnection {
    async fn ping(&mut self) -> CacheResult<()> {
        self.check()
    }

    async fn get(&mut self, key: &str) -> CacheResult<Option<String>> {
        self.check()?;
        let mut entries = self.cache.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set_ex(&mut self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()> {
        self.check()?;
        let mut entries = self.cache.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry::new(value.to_string(), Some(ttl_seconds)),
        );
        Ok(())
    }

    async fn delete(&mut self, key: &str) -> CacheResult<()> {
        self.check()?;
        self.cache.entries.write().await.remove(key);
        Ok(())
    }
}
