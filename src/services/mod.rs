//! Services Module
//!
//! Logic shared by handlers that spans the store and the cache.

pub mod statistics;

pub use statistics::{
    invalidate_statistics, load_statistics, STATISTICS_CACHE_KEY, STATISTICS_TTL_SECS,
};
