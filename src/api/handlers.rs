//! API Handlers
//!
//! HTTP request handlers for each endpoint of the user statistics API.

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::{error, info, warn};

use super::extractors::CacheConn;
use crate::cache::{CacheBackend, CacheError};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    BannerResponse, CreateUserRequest, HealthResponse, ProbeStatus, SystemStatistics, User,
};
use crate::services::{invalidate_statistics, load_statistics};
use crate::store::{StoreError, UserStore};

/// Application state shared across all handlers.
///
/// Holds handles to the injected store and cache backends. Neither carries
/// request state; connections are acquired per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub cache: Arc<dyn CacheBackend>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState from the given backends.
    pub fn new(store: Arc<dyn UserStore>, cache: Arc<dyn CacheBackend>, config: Config) -> Self {
        Self {
            store,
            cache,
            config: Arc::new(config),
        }
    }
}

/// Handler for GET /
pub async fn root_handler(State(state): State<AppState>) -> Json<BannerResponse> {
    Json(BannerResponse::new(&state.config.environment))
}

/// Handler for GET /health
///
/// Probes the database and the cache concurrently. Never fails: probe
/// outcomes are reported in the body.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (database, cache) = tokio::join!(
        probe_store(state.store.as_ref()),
        probe_cache(state.cache.as_ref())
    );

    let response = HealthResponse::from_probes(cache, database);
    if !response.is_healthy() {
        warn!("Health degraded: cache={:?}, database={:?}", cache, database);
    }
    Json(response)
}

async fn probe_store(store: &dyn UserStore) -> ProbeStatus {
    match store.ping().await {
        Ok(()) => ProbeStatus::Active,
        Err(StoreError::Unavailable(e)) => {
            warn!("Database unreachable: {}", e);
            ProbeStatus::Inactive
        }
        Err(e) => {
            warn!("Database probe failed: {}", e);
            ProbeStatus::Error
        }
    }
}

async fn probe_cache(cache: &dyn CacheBackend) -> ProbeStatus {
    let mut conn = match cache.connect().await {
        Ok(conn) => conn,
        Err(e) => {
            warn!("Cache unreachable: {}", e);
            return ProbeStatus::Inactive;
        }
    };

    match conn.ping().await {
        Ok(()) => ProbeStatus::Active,
        Err(CacheError::Unavailable(e)) => {
            warn!("Cache connection lost: {}", e);
            ProbeStatus::Inactive
        }
        Err(e) => {
            warn!("Cache probe failed: {}", e);
            ProbeStatus::Error
        }
    }
}

/// Handler for POST /users
///
/// Inserts the user, then drops the cached statistics. Invalidation only
/// happens after a successful insert and never fails the request.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<User>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let user = match state.store.create_user(req.into_new_user()).await {
        Ok(user) => user,
        Err(StoreError::UniqueViolation(detail)) => {
            info!("Rejected duplicate user: {}", detail);
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        Err(e) => {
            error!("Error creating user: {}", e);
            return Err(e.into());
        }
    };

    invalidate_statistics(state.cache.as_ref()).await;

    info!("Created user {} ({})", user.id, user.username);
    Ok(Json(user))
}

/// Handler for GET /users
pub async fn list_users_handler(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = state.store.list_users().await.map_err(|e| {
        error!("Error listing users: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(users))
}

/// Handler for GET /statistics
///
/// Requires a cache connection up front; see `CacheConn`.
pub async fn statistics_handler(
    State(state): State<AppState>,
    CacheConn(mut conn): CacheConn,
) -> Result<Json<SystemStatistics>> {
    let stats = load_statistics(state.store.as_ref(), conn.as_mut())
        .await
        .map_err(|e| {
            error!("Error computing statistics: {}", e);
            AppError::from(e)
        })?;

    Ok(Json(stats))
}
