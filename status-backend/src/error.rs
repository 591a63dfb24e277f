use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use swarm_gateway::GatewayError;
use thiserror::Error;

/// Request failures. Diagnostic findings are not errors and never end up here.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid base64 encode for the image parameter.")]
    InvalidImageParameter,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidImageParameter => StatusCode::BAD_REQUEST,
            ApiError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}
