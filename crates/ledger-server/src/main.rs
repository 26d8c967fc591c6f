//! Ledger Server
//!
//! HTTP API for customers and their purchases, backed by an embedded
//! SQLite file. Deleting a customer cascades to its purchases.

mod error;
mod extractors;
mod handlers;
mod settings;
mod storage;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use settings::ServerConfig;
use storage::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
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
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[FATAL] Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Ledger Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server(config: ServerConfig) -> Result<()> {
    info!(
        "Config loaded: bind={}, db={}",
        config.bind_address, config.database_path
    );

    let db = Database::connect(&config.database_path)
        .await
        .context("Failed to open database")?;
    db.init_schema()
        .await
        .context("Failed to initialize database schema")?;

    let state = AppState { db: Arc::new(db) };
    let app = router(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/clientes",
            get(handlers::customers::list).post(handlers::customers::create),
        )
        .route(
            "/clientes/:id",
            put(handlers::customers::update).delete(handlers::customers::delete),
        )
        .route("/compras", post(handlers::purchases::create))
        .route(
            "/compras/:id",
            put(handlers::purchases::update).delete(handlers::purchases::delete),
        )
        .route("/compras/:id/pagar", put(handlers::purchases::toggle_paid))
        .fallback(handlers::not_found)
        // Layers
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
