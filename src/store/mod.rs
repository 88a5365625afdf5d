//! Store Module
//!
//! Relational persistence for user records behind the `UserStore` trait.

mod memory;
mod postgres;


use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, User};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

// == Store Error Enum ==
/// Failures reported by a store adapter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The database could not be reached
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// Username or email already taken
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Any other statement failure
    #[error("Query failed: {0}")]
    Query(String),
}

/// Convenience Result type for store adapters.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence operations for users.
///
/// Implementations acquire and release their connections per call.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Trivial round-trip used by the health check.
    async fn ping(&self) -> StoreResult<()>;

    /// Inserts a user, assigning its id and creation timestamp.
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;

    /// All users, newest first.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn count_users(&self) -> StoreResult<i64>;
}
