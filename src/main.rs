//! User Statistics API - A small user registry with cached statistics
//!
//! Users live in PostgreSQL; a statistics snapshot is cached in Redis and
//! invalidated whenever a user is created.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_stats_api::cache::{CacheBackend, MemoryCache, RedisCache};
use user_stats_api::config::MEMORY_URL;
use user_stats_api::store::{MemoryUserStore, PgUserStore, UserStore};
use user_stats_api::{create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the user statistics API.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the store and cache backends (no connection is opened yet)
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_stats_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting User Statistics API");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, environment={}, cleanup_interval={}s",
        config.server_port, config.environment, config.cleanup_interval
    );

    let store: Arc<dyn UserStore> = if config.database_url == MEMORY_URL {
        warn!("Using in-memory user store; data is lost on exit");
        Arc::new(MemoryUserStore::new())
    } else {
        let store = PgUserStore::connect_lazy(&config.database_url, config.db_max_connections)
            .context("Invalid DATABASE_URL")?;
        Arc::new(store)
    };

    let mut cleanup_handle: Option<JoinHandle<()>> = None;
    let cache: Arc<dyn CacheBackend> = if config.redis_url == MEMORY_URL {
        warn!("Using in-memory cache");
        let cache = MemoryCache::new();
        cleanup_handle = Some(spawn_cleanup_task(cache.clone(), config.cleanup_interval));
        Arc::new(cache)
    } else {
        Arc::new(RedisCache::open(&config.redis_url).context("Invalid REDIS_URL")?)
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let app = create_router(AppState::new(store, cache, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task if one is running.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
