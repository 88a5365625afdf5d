//! Request and Response models for the user statistics API
//!
//! This module defines the records and DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;
pub mod statistics;
pub mod user;

// Re-export commonly used types
pub use requests::CreateUserRequest;
pub use responses::{BannerResponse, ErrorResponse, HealthResponse, ProbeStatus, ServiceProbes};
pub use statistics::SystemStatistics;
pub use user::{NewUser, User};
