//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{middleware, Router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_principal;
use super::hal::{LinkBuilder, API_BASE};
use super::routes;
use crate::config::{AuthConfig, BlogConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub links: LinkBuilder,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &BlogConfig) -> Self {
        Self {
            pool,
            links: LinkBuilder::new(&config.public_url),
            auth: config.auth.clone(),
        }
    }
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:8080"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:8080"),
        ])
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the application router: `/health` plus the API under `/api/v1`.
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    let state = Arc::new(state);

    let api = Router::new()
        .merge(routes::users::router())
        .merge(routes::posts::router())
        .merge(routes::comments::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_principal));

    Router::new()
        .merge(routes::health::router())
        .nest(API_BASE, api)
        .layer(cors_layer(cors_permissive))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config.database_url).await?;
/// run_server(pool, &config).await?;
/// ```
pub async fn run_server(pool: SqlitePool, config: &BlogConfig) -> Result<(), ServerError> {
    let app = build_router(AppState::new(pool, config), config.cors_permissive);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        auth = ?config.auth.mode,
        "Server listening on {}",
        config.bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
