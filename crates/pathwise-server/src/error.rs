//! HTTP mapping of domain errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pathwise_core::PathwiseError;
use serde_json::json;

/// A [`PathwiseError`] rendered as a JSON `{ "error": ... }` response.
#[derive(Debug)]
pub struct ApiError(pub PathwiseError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PathwiseError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            e if e.is_collaborator_failure() => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PathwiseError> for ApiError {
    fn from(err: PathwiseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self.0, %status, "Request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;
