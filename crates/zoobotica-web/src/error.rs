//! HTTP error responses.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};
use zoobotica_core::error::{DropError, ZoobotError};

/// Errors returned by the HTTP handlers.
///
/// Each variant renders as `{"error": ...}` with a fixed status: validation
/// failures are 400, a missing credential or upstream failure is 500, and a
/// rejected drop is 422 (404 for an unknown slot).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON in request body")]
    InvalidJson,

    #[error("Missing required fields")]
    MissingFields { received: Option<Value> },

    #[error("Invalid category")]
    InvalidCategory,

    #[error("Invalid robot data format")]
    InvalidRobotData,

    #[error("Robot has no traits to draw")]
    EmptyRobot,

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("API key not configured")]
    NotConfigured,

    /// Upstream call failed. `error` is the fixed public message.
    #[error("{error}")]
    Upstream {
        error: &'static str,
        details: Option<String>,
    },

    /// Image generation failed; the message is relayed as the error.
    #[error("{0}")]
    ImageFailed(String),

    #[error("{0}")]
    Rejected(DropError),

    #[error("{0}")]
    Internal(ZoobotError),

    #[error("Background task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn upstream(error: &'static str, details: impl ToString) -> Self {
        ApiError::Upstream {
            error,
            details: Some(details.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson
            | ApiError::MissingFields { .. }
            | ApiError::InvalidCategory
            | ApiError::InvalidRobotData
            | ApiError::EmptyRobot
            | ApiError::UnknownEnvironment(_) => StatusCode::BAD_REQUEST,
            ApiError::NotConfigured
            | ApiError::Upstream { .. }
            | ApiError::ImageFailed(_)
            | ApiError::Internal(_)
            | ApiError::Blocking(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Rejected(DropError::UnknownSlot(_)) => StatusCode::NOT_FOUND,
            ApiError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<ZoobotError> for ApiError {
    fn from(e: ZoobotError) -> Self {
        match e {
            ZoobotError::InvalidRobotData(_) => ApiError::InvalidRobotData,
            ZoobotError::Drop(drop) => ApiError::Rejected(drop),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::MissingFields {
                received: Some(received),
            } => json!({ "error": self.to_string(), "received": received }),
            ApiError::Upstream {
                error,
                details: Some(details),
            } => json!({ "error": error, "details": details }),
            ApiError::Rejected(drop) => json!({ "error": drop.to_string(), "reason": drop.reason() }),
            _ => json!({ "error": self.to_string() }),
        };

        if status.is_server_error() {
            error!(%status, "{}", self);
        } else {
            debug!(%status, "{}", self);
        }
        (status, Json(body)).into_response()
    }
}

/// `Json` extractor whose rejection is [`ApiError::InvalidJson`].
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                debug!("rejected request body: {}", rejection.body_text());
                Err(ApiError::InvalidJson)
            }
        }
    }
}
