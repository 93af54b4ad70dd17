//! Recipe Box Server
//!
//! Serves HTML pages for browsing and editing recipes, backed by either an
//! embedded SQLite file or an in-memory map.

mod config;
mod form;
mod handlers;
mod ids;
mod logging;
mod storage;
mod views;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    response::Redirect,
    routing::{get, post},
    Router,
};
use clap::Parser;
use recipe_core::RecipeStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use config::{Cli, ServerConfig};
use ids::IdGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecipeStore>,
    pub ids: Arc<IdGenerator>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let cli = Cli::parse();
    let config = match ServerConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[FATAL] Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Dropping the guard stops the file writer
    let _log_guard = match logging::init(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("[FATAL] {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Starting Recipe Box Server v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server(config: ServerConfig) -> Result<()> {
    info!(
        "Config loaded: env={}, store={:?}, db={}",
        config.env,
        config.store,
        config.db_path.display()
    );

    let store = storage::open(&config).await?;
    let state = AppState {
        store: store.clone(),
        ids: Arc::new(IdGenerator::new()),
    };

    let app = app(state, &config)?;

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .context("Failed to parse bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    if config.is_development() {
        info!("Server listening on {}", config.base_url);
    } else {
        info!("Server listening on port {}", config.port);
    }

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    info!("Closing recipe store...");
    if let Err(e) = store.close().await {
        warn!("Failed to close recipe store: {}", e);
    }
    served?;

    info!("Server stopped");
    Ok(())
}

/// Routes without middleware
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/recipes") }))
        .route("/health", get(handlers::health))
        .route(
            "/recipes",
            get(handlers::recipes::list).post(handlers::recipes::create),
        )
        .route("/recipes/new", get(handlers::recipes::new_form))
        .route(
            "/recipes/:id",
            get(handlers::recipes::show)
                .put(handlers::recipes::replace)
                .post(handlers::recipes::update)
                .delete(handlers::recipes::delete),
        )
        .route("/recipes/:id/edit", get(handlers::recipes::edit_form))
        .route("/recipes/:id/delete", post(handlers::recipes::delete))
}

fn app(state: AppState, config: &ServerConfig) -> Result<Router> {
    let cors = if config.allowed_origin == "*" {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origin: HeaderValue = config
            .allowed_origin
            .parse()
            .with_context(|| format!("Invalid allowed_origin: {}", config.allowed_origin))?;
        CorsLayer::new().allow_origin(origin)
    };

    Ok(routes()
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use storage::MemoryStore;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
            ids: Arc::new(IdGenerator::new()),
        }
    }

    #[tokio::test]
    async fn test_cors_for_configured_origin() {
        let mut config = ServerConfig::load(&Cli::default()).unwrap();
        config.allowed_origin = "https://recipes.example.com".to_string();
        let app = app(state(), &config).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://recipes.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://recipes.example.com"
        );
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let mut config = ServerConfig::load(&Cli::default()).unwrap();
        config.allowed_origin = "bad\norigin".to_string();
        assert!(app(state(), &config).is_err());
    }
}
