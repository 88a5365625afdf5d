//! System statistics snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label reported for a dependency that served the snapshot.
pub const STATUS_ACTIVE: &str = "active";

/// Derived, non-persisted view of the system. Cached as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatistics {
    pub total_users: i64,
    pub cache_status: String,
    pub database_status: String,
    /// When the snapshot was computed
    pub timestamp: DateTime<Utc>,
}

impl SystemStatistics {
    /// Builds a snapshot computed now.
    pub fn fresh(total_users: i64) -> Self {
        Self {
            total_users,
            cache_status: STATUS_ACTIVE.to_string(),
            database_status: STATUS_ACTIVE.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
