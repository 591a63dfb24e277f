//! HTTP routes.
//!
//! Infrastructure failures become non-2xx responses. Diagnostic findings are
//! returned with `200 OK` inside the aggregate's `error` field.

use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use log::{error, info};
use swarm_gateway::StatusClient;
use swarm_status::StatusAggregate;
use tower_http::cors::CorsLayer;

pub const DEPLOYMENT_STATUS_ROUTE: &str =
    "/v1/docker-swarm-service-status/deployment-status/:service/:image";
pub const SERVICE_STATUS_ROUTE: &str = "/v1/docker-swarm-service-status/service-status/:service";

#[derive(Clone)]
pub struct AppState {
    client: StatusClient,
}

impl AppState {
    pub fn new(client: StatusClient) -> Self {
        Self { client }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(DEPLOYMENT_STATUS_ROUTE, get(deployment_status))
        .route(SERVICE_STATUS_ROUTE, get(service_status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// `:image` is the image reference in URL-safe base64.
async fn deployment_status(
    State(state): State<AppState>,
    Path((service, image)): Path<(String, String)>,
) -> Result<Json<StatusAggregate>, ApiError> {
    let image = decode_image(&image)?;

    let status = state
        .client
        .deployment_status(&service, &image)
        .await
        .map_err(|e| {
            error!("Deployment status of {} ({}) failed: {}", service, image, e);
            ApiError::from(e)
        })?;

    log_finding(&status);
    Ok(Json(status))
}

async fn service_status(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Result<Json<StatusAggregate>, ApiError> {
    let status = state.client.service_status(&service).await.map_err(|e| {
        error!("Service status of {} failed: {}", service, e);
        ApiError::from(e)
    })?;

    log_finding(&status);
    Ok(Json(status))
}

fn decode_image(encoded: &str) -> Result<String, ApiError> {
    let bytes = URL_SAFE
        .decode(encoded)
        .or_else(|_| URL_SAFE_NO_PAD.decode(encoded))
        .map_err(|e| {
            error!("Image parameter '{}' is not base64: {}", encoded, e);
            ApiError::InvalidImageParameter
        })?;

    String::from_utf8(bytes).map_err(|_| ApiError::InvalidImageParameter)
}

fn log_finding(status: &StatusAggregate) {
    if let Some(finding) = &status.error {
        info!("{}: {}", status.name, finding);
    }
}
