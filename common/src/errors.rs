use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy for the gateway, mapped onto HTTP status codes in one
/// place by the [`IntoResponse`] impl.
#[derive(Error, Debug)]
pub enum AppError {
    /// The weather provider answered with a non-2xx status.
    #[error("{message}")]
    UpstreamError { status: u16, message: String },

    /// The provider could not be reached at the network level.
    #[error("Weather provider unreachable: {0}")]
    NetworkError(reqwest::Error),

    /// The provider did not answer within the configured deadline.
    #[error("Weather provider timed out: {0}")]
    TimeoutError(String),

    /// A successful provider response did not match the expected shape.
    #[error("Unexpected weather provider response: {0}")]
    DecodeError(String),

    /// The request was rejected before any upstream work happened.
    #[error("{0}")]
    ValidationError(String),
}

/// Client-facing error body. `success` is always `false` here, mirroring the
/// `true` carried by every successful payload.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl AppError {
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamError {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::DecodeError(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            // Provider statuses pass through verbatim; anything that is not a
            // valid HTTP status becomes 400.
            AppError::UpstreamError { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            AppError::NetworkError(_) => StatusCode::BAD_GATEWAY,
            AppError::TimeoutError(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::DecodeError(_) => StatusCode::BAD_GATEWAY,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL so the provider API key never reaches logs or
        // response bodies.
        if err.is_timeout() {
            Self::TimeoutError(err.without_url().to_string())
        } else {
            Self::NetworkError(err.without_url())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(ErrorResponse {
            success: false,
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
