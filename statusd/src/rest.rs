use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{error, info};

use crate::auth::{api_key_auth, Authenticator};
use crate::errors::{Error, ValidationError};
use crate::metrics::{
    DB_FAILURES_TOTAL, INVALID_UPDATES_TOTAL, UPDATES_TOTAL, UPSERT_LATENCY_SECONDS,
};
use crate::model::{DeviceStatus, HealthResponse, SummaryResponse, UpdateResponse};
use crate::store::StatusStore;
use crate::validate::validate;

#[derive(Debug, Clone)]
struct AppState {
    store: StatusStore,
}

pub fn create_router(store: StatusStore, auth: Arc<Authenticator>) -> Router {
    let state = AppState { store };

    let gated = Router::new()
        .route("/status", post(submit_status))
        .route("/status/summary", get(get_summary))
        .route("/status/:device_id", get(get_device_status))
        .route_layer(middleware::from_fn_with_state(auth, api_key_auth))
        .with_state(state);

    Router::new().route("/health", get(health)).merge(gated)
}

async fn submit_status(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<UpdateResponse>, Error> {
    // An empty or unparseable body counts the same as no payload at all.
    let payload: Value =
        serde_json::from_slice(&body).map_err(|_| ValidationError::MissingPayload)?;
    let status = validate(&payload)?;

    let start = Instant::now();
    state.store.upsert(&status).await?;
    UPSERT_LATENCY_SECONDS.observe(start.elapsed().as_secs_f64());

    UPDATES_TOTAL.inc();
    info!("Stored status for device {}", status.device_id);

    Ok(Json(UpdateResponse {
        message: "Status updated successfully",
    }))
}

async fn get_device_status(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<DeviceStatus>, Error> {
    match state.store.get(&device_id).await? {
        Some(status) => Ok(Json(status)),
        None => Err(Error::NotFound),
    }
}

async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, Error> {
    let devices = state.store.list_all().await?;
    Ok(Json(SummaryResponse { devices }))
}

/// Liveness only; deliberately does not probe the store.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "API is running",
    })
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let code = match &self {
            Error::Validation(_) => {
                INVALID_UPDATES_TOTAL.inc();
                StatusCode::BAD_REQUEST
            }
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Database(_) | Error::Migration(_) => {
                DB_FAILURES_TOTAL.inc();
                error!("Storage failure: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (code, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
