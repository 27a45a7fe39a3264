//! Request error taxonomy
//!
//! Every failure is scoped to the request that caused it and maps to exactly
//! one HTTP status; the router turns it into a JSON error envelope.

use hyper::StatusCode;
use thiserror::Error;

use crate::http::multipart::MultipartError;
use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Client sent something the endpoint cannot accept
    #[error("{0}")]
    MalformedRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Request body too large (max: {max} bytes)")]
    PayloadTooLarge { max: u64 },

    /// Image decoding or model call failed
    #[error("Inference error: {0}")]
    InferenceFailure(#[from] ModelError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InferenceFailure(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::MalformedRequest(format!("Failed to parse upload: {err}"))
    }
}
