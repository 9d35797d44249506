use std::sync::Arc;

use axum::{routing::get, Router};
use tracing::{error, info, warn};

use statusd::auth::Authenticator;
use statusd::config::Config;
use statusd::store::StatusStore;
use statusd::{metrics, rest};

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting device status API");
    info!("HTTP server: {}", config.http_addr);
    info!("Database: {}", config.database_url);
    if config.api_keys.is_empty() {
        warn!("API_KEYS is empty; every authenticated request will be rejected");
    } else {
        info!("Configured API keys: {}", config.api_keys.len());
    }

    metrics::init_metrics();

    let store = match StatusStore::connect(&config.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let authenticator = Arc::new(Authenticator::new(&config.api_keys));

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(rest::create_router(store, authenticator));

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", config.http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", config.http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    tokio::select! {
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}
