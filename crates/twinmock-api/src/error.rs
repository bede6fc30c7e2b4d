//! HTTP error responses
//!
//! Every error is answered with a JSON body of the form `{"message": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use twinmock_core::MockError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Direct-method invocation could not be answered
    #[error(transparent)]
    Invocation(#[from] MockError),

    /// A management call named a device that does not exist
    #[error("Could not find the device with deviceId {0}")]
    DeviceNotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Map a core error raised by a management endpoint
    pub fn management(err: MockError) -> Self {
        match err {
            MockError::UnknownDevice { device_id } => Self::DeviceNotFound(device_id),
            other => Self::Invocation(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Invocation(_) | Self::DeviceNotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text of the `message` field
    pub fn message(&self) -> String {
        match self {
            Self::Invocation(MockError::UnknownDevice { .. }) => "unknown deviceId".to_string(),
            Self::Invocation(MockError::UnknownMethod { .. }) => "unknown method".to_string(),
            Self::Invocation(MockError::NoResponseConfigured { .. }) => {
                "no response known".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(message) = &self {
            tracing::error!(%message, "request failed");
        }
        (self.status(), Json(json!({ "message": self.message() }))).into_response()
    }
}
