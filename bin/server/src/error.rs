//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cartwise_ai::LlmError;
use cartwise_core::RequestId;
use rootcause::Report;
use std::fmt;

/// An error returned from an API handler.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// The completion gateway failed.
    Gateway {
        /// Request the failure belongs to.
        request_id: RequestId,
        /// What went wrong.
        error: LlmError,
    },
}

impl ApiError {
    /// Wraps a failed gateway call, logging the full report.
    pub fn gateway(request_id: RequestId, report: &Report<LlmError>) -> Self {
        let error = report.current_context().clone();
        if matches!(error, LlmError::RateLimited { .. }) {
            tracing::warn!(%request_id, error = %report, "Provider rate limited request");
        } else {
            tracing::error!(%request_id, error = %report, "Completion gateway call failed");
        }
        Self::Gateway { request_id, error }
    }

    /// The status code sent to the client.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Gateway { error, .. } => match error {
                LlmError::ProviderUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                LlmError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                LlmError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                LlmError::InvalidConfig { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                LlmError::RequestFailed { .. }
                | LlmError::ProviderRejected { .. }
                | LlmError::ResponseParseFailed { .. } => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gateway { error, .. } => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Gateway { request_id, error } => serde_json::json!({
                "error": error.to_string(),
                "requestId": request_id.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
