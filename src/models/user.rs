//! User records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Server-assigned identifier
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    /// Assigned at insert time
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the client when creating a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            full_name: None,
        }
    }
}
