//! API Module
//!
//! HTTP handlers and routing for the user statistics REST API.
//!
//! # Endpoints
//! - `GET /` - Service banner
//! - `GET /health` - Aggregated dependency health
//! - `POST /users` - Create a user
//! - `GET /users` - List users, newest first
//! - `GET /statistics` - Cached system statistics
//! - `GET /docs` - Redoc viewer (development only)
//! - `GET /openapi.json` - OpenAPI document (development only)

pub mod docs;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use extractors::CacheConn;
pub use handlers::*;
pub use routes::create_router;
