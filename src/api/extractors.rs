//! Request extractors

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::handlers::AppState;
use crate::cache::CacheConnection;
use crate::error::AppError;

/// A cache connection opened and pinged for the current request.
///
/// Rejects with 503 when the cache cannot be reached or does not answer the
/// ping, so handlers taking it are never entered without a live connection.
pub struct CacheConn(pub Box<dyn CacheConnection>);

#[async_trait]
impl FromRequestParts<AppState> for CacheConn {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let live = match state.cache.connect().await {
            Ok(mut conn) => match conn.ping().await {
                Ok(()) => Ok(conn),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match live {
            Ok(conn) => Ok(CacheConn(conn)),
            Err(e) => {
                warn!("Error connecting to cache: {}", e);
                Err(AppError::Unavailable("Cache service unavailable".to_string()))
            }
        }
    }
}
