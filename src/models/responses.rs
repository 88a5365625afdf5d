//! Response DTOs for the user statistics API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::config::Environment;

/// Response body for the banner endpoint (GET /)
#[derive(Debug, Clone, Serialize)]
pub struct BannerResponse {
    pub message: String,
    /// Crate version
    pub version: String,
    pub environment: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl BannerResponse {
    pub fn new(environment: &Environment) -> Self {
        Self {
            message: "Welcome to the user statistics API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: environment.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Outcome of probing a single dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// Reachable and answered the probe
    Active,
    /// Could not be reached
    Inactive,
    /// Reached, but the probe failed
    Error,
}

/// Per-dependency probe results.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceProbes {
    pub cache: ProbeStatus,
    pub database: ProbeStatus,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    pub services: ServiceProbes,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Aggregates probe results. Healthy only if every dependency is active.
    pub fn from_probes(cache: ProbeStatus, database: ProbeStatus) -> Self {
        let status = if cache == ProbeStatus::Active && database == ProbeStatus::Active {
            "healthy"
        } else {
            "degraded"
        };
        Self {
            status: status.to_string(),
            services: ServiceProbes { cache, database },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
