//! User Statistics API - A small user registry with cached statistics
//!
//! Users live in PostgreSQL; a statistics snapshot is cached in Redis and
//! invalidated whenever a user is created.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
