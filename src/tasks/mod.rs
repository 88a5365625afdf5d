//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: Sweeps expired entries from the in-memory cache backend

mod cleanup;

pub use cleanup::spawn_cleanup_task;
