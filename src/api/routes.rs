//! API Routes
//!
//! Configures the Axum router with all endpoints and middleware.

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::docs::{docs_page_handler, openapi_handler, OPENAPI_PATH};
use super::handlers::{
    create_user_handler, health_handler, list_users_handler, root_handler, statistics_handler,
    AppState,
};
use crate::config::Config;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: any origin in development, the configured origin otherwise
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let mut router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/users", post(create_user_handler).get(list_users_handler))
        .route("/statistics", get(statistics_handler));

    if state.config.environment.is_development() {
        router = router
            .route("/docs", get(docs_page_handler))
            .route(OPENAPI_PATH, get(openapi_handler));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Development allows any origin without credentials. Other environments
/// allow only the configured origin, with credentials.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.environment.is_development() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origin = match HeaderValue::from_str(&config.cors_allowed_origin) {
        Ok(origin) => Some(origin),
        Err(_) => {
            warn!(
                "Ignoring invalid CORS origin {:?}; cross-origin requests will be refused",
                config.cors_allowed_origin
            );
            None
        }
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origin))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
