use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::ResolveError;
use crate::synthesis::SynthesisError;

/// Errors surfaced by the HTTP boundary, rendered in the OpenAI error envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("{message}")]
    InvalidRequest {
        message: String,
        param: Option<&'static str>,
    },

    #[error("Invalid or missing API key")]
    Unauthorized,

    #[error("The model '{0}' does not exist")]
    ModelNotFound(String),

    #[error("No synthesis backend is configured")]
    BackendUnavailable,

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

impl ApiError {
    pub fn invalid(message: impl Into<String>, param: &'static str) -> Self {
        ApiError::InvalidRequest {
            message: message.into(),
            param: Some(param),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Resolve(_) | ApiError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::ModelNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BackendUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Synthesis(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::Resolve(_) | ApiError::InvalidRequest { .. } | ApiError::ModelNotFound(_) => {
                "invalid_request_error"
            }
            ApiError::Unauthorized => "authentication_error",
            ApiError::BackendUnavailable | ApiError::Synthesis(_) => "server_error",
        }
    }

    fn param(&self) -> Option<&'static str> {
        match self {
            ApiError::Resolve(e) => Some(e.param()),
            ApiError::InvalidRequest { param, .. } => *param,
            ApiError::ModelNotFound(_) => Some("model"),
            _ => None,
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Resolve(e) => Some(e.code()),
            ApiError::Unauthorized => Some("invalid_api_key"),
            ApiError::ModelNotFound(_) => Some("model_not_found"),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        let body = json!({
            "error": {
                "message": self.to_string(),
                "type": self.error_type(),
                "param": self.param(),
                "code": self.code(),
            }
        });

        (status, Json(body)).into_response()
    }
}
