//! Redis cache backend

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::Connection;
use redis::{Client, RedisError, RedisResult};

use super::{CacheBackend, CacheConnection, CacheError, CacheResult};

/// Upper bound on connecting and on each command before the cache is
/// reported unavailable.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// `CacheBackend` that opens a Redis connection per request.
#[derive(Debug, Clone)]
pub struct RedisCache {
    client: Client,
    timeout: Duration,
}

impl RedisCache {
    /// Parses the URL. No connection is made until `connect`.
    pub fn open(redis_url: &str) -> CacheResult<Self> {
        Self::open_with_timeout(redis_url, DEFAULT_TIMEOUT)
    }

    pub fn open_with_timeout(redis_url: &str, timeout: Duration) -> CacheResult<Self> {
        let client = Client::open(redis_url)?;
        Ok(Self { client, timeout })
    }
}

impl From<RedisError> for CacheError {
    fn from(err: RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_timeout()
        {
            CacheError::Unavailable(err.to_string())
        } else {
            CacheError::Command(err.to_string())
        }
    }
}

/// Runs a Redis call under `timeout`. An elapsed deadline means the server
/// is unreachable.
async fn with_timeout<T>(
    timeout: Duration,
    fut: impl Future<Output = RedisResult<T>>,
) -> CacheResult<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(CacheError::from),
        Err(_) => Err(CacheError::Unavailable(format!(
            "no reply within {}ms",
            timeout.as_millis()
        ))),
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn connect(&self) -> CacheResult<Box<dyn CacheConnection>> {
        // A plain connection, not a multiplexed one: the multiplexed driver
        // panics when the peer closes the socket during the handshake.
        let conn = with_timeout(self.timeout, self.client.get_async_connection())
            .await
            .map_err(|e| match e {
                CacheError::Command(msg) => CacheError::Unavailable(msg),
                unavailable => unavailable,
            })?;
        Ok(Box::new(RedisConnection {
            conn,
            timeout: self.timeout,
        }))
    }
}

struct RedisConnection {
    conn: Connection,
    timeout: Duration,
}

#[async_trait]
impl CacheConnection for RedisConnection {
    async fn ping(&mut self) -> CacheResult<()> {
        let cmd = redis::cmd("PING");
        with_timeout(self.timeout, cmd.query_async::<_, String>(&mut self.conn)).await?;
        Ok(())
    }

    async fn get(&mut self, key: &str) -> CacheResult<Option<String>> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        with_timeout(self.timeout, cmd.query_async::<_, Option<String>>(&mut self.conn)).await
    }

    async fn set_ex(&mut self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("EX").arg(ttl_seconds);
        with_timeout(self.timeout, cmd.query_async::<_, ()>(&mut self.conn)).await
    }

    async fn delete(&mut self, key: &str) -> CacheResult<()> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(key);
        with_timeout(self.timeout, cmd.query_async::<_, i64>(&mut self.conn)).await?;
        Ok(())
    }
}
