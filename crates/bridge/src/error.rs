//! HTTP error responses for bridge routes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::db::settings::SettingsError;

/// Errors surfaced to HTTP callers.
///
/// Webhook handlers deliberately avoid returning [`ApiError::Upstream`] for
/// Omnisend failures; those are logged and swallowed so SureCart does not
/// retry into a poisoned state. This type covers the cases where a 4xx/5xx
/// response is the right behavior.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Database error: {0}")]
    Database(#[from] SettingsError),
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Database(err) => {
                tracing::error!(error = %err, "settings store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
            Self::Upstream(msg) => {
                tracing::error!(error = %msg, "upstream failure");
                (StatusCode::BAD_GATEWAY, "Upstream service error".to_owned())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let response = ApiError::BadRequest("missing field".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_maps_to_502() {
        let response = ApiError::Upstream("timeout".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
