//! Mapping scan failures onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use qrscan_core::ScanError;
use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        let status = match &err {
            ScanError::MalformedRequest(_)
            | ScanError::MissingField(_)
            | ScanError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ScanError::UnsupportedImage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScanError::PayloadTooLarge { .. } | ScanError::ImageTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ScanError::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ScanError::Read { .. } | ScanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Keep 413 (body limit) and 415 (content type); everything else is a bad body
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE => rejection.status(),
            _ => StatusCode::BAD_REQUEST,
        };
        let err = ScanError::MalformedRequest(rejection.body_text());
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{} {}", self.status.as_u16(), self.message);
        } else {
            tracing::debug!("{} {}", self.status.as_u16(), self.message);
        }
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ScanError::MissingField("image"), StatusCode::BAD_REQUEST),
            (
                ScanError::InvalidPayload("no comma".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ScanError::UnsupportedImage("garbage".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ScanError::ImageTooLarge {
                    width: 1,
                    height: 20000,
                    max_dim: 10000,
                },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                ScanError::Timeout {
                    stage: "decode".into(),
                    timeout_ms: 5000,
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ScanError::Internal("join".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status, expected);
        }
    }

    #[test]
    fn test_server_side_failures_are_5xx() {
        let err = ScanError::Read {
            path: "/tmp/missing.png".into(),
            message: "not found".into(),
        };
        assert!(ApiError::from(err).status.is_server_error());
        assert!(ApiError::from(ScanError::MalformedRequest("x".into()))
            .status
            .is_client_error());
    }
}
