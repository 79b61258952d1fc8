// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from service errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use qissa_core::QissaError;

/// Structured error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper turning a [`QissaError`] into an HTTP response.
///
/// Timeouts map to 504 so callers can tell a slow backend from a broken
/// one; the upstream message is preserved in the body for diagnostics.
pub struct ApiError(pub QissaError);

impl From<QissaError> for ApiError {
    fn from(e: QissaError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            QissaError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            QissaError::NotFound(_) => StatusCode::NOT_FOUND,
            QissaError::Conflict(_) => StatusCode::CONFLICT,
            QissaError::NoContent(_) => StatusCode::BAD_REQUEST,
            QissaError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            QissaError::Config(_)
            | QissaError::Storage { .. }
            | QissaError::Provider { .. }
            | QissaError::Submission { .. }
            | QissaError::JobFailed { .. }
            | QissaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn status_of(e: QissaError) -> StatusCode {
        ApiError(e).into_response().status()
    }

    #[test]
    fn taxonomy_maps_to_distinct_statuses() {
        assert_eq!(
            status_of(QissaError::Unauthorized("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(QissaError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(QissaError::Conflict("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(QissaError::NoContent("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(QissaError::Timeout {
                duration: Duration::from_secs(1)
            }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(QissaError::JobFailed { reason: "x".into() }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
