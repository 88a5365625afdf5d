//! In-memory user store
//!
//! Substitute for PostgreSQL in tests and local runs. Enforces the same
//! uniqueness and ordering rules as the `users` table.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, UserStore};
use crate::models::{NewUser, User};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<User>,
    next_id: i64,
}

/// `UserStore` holding rows in process memory.
///
/// Clones share the same table.
#[derive(Debug, Clone)]
pub struct MemoryUserStore {
    table: Arc<RwLock<Table>>,
    reachable: Arc<AtomicBool>,
    queries_failing: Arc<AtomicBool>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table::default())),
            reachable: Arc::new(AtomicBool::new(true)),
            queries_failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulates the database going down or coming back.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Simulates a reachable database that rejects every statement.
    pub fn set_queries_failing(&self, failing: bool) {
        self.queries_failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        if self.queries_failing.load(Ordering::SeqCst) {
            return Err(StoreError::Query("relation \"users\" does not exist".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }

    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        self.check()?;
        let mut table = self.table.write().await;

        if let Some(existing) = table
            .rows
            .iter()
            .find(|u| u.username == new_user.username || u.email == new_user.email)
        {
            let column = if existing.username == new_user.username {
                "username"
            } else {
                "email"
            };
            return Err(StoreError::UniqueViolation(format!(
                "duplicate key value violates unique constraint on {}",
                column
            )));
        }

        table.next_id += 1;
        let user = User {
            id: table.next_id,
            username: new_user.username,
            email: new_user.email,
            full_name: new_user.full_name,
            created_at: Utc::now(),
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.check()?;
        let table = self.table.read().await;
        let mut users = table.rows.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn count_users(&self) -> StoreResult<i64> {
        self.check()?;
        Ok(self.table.read().await.rows.len() as i64)
    }
}
