use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::tools::ToolError;

/// HTTP error, serialised as `{"detail": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                detail: detail.into(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.body.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, detail = %self.body.detail, "Request failed");
        } else {
            tracing::warn!(status = %self.status, detail = %self.body.detail, "Request rejected");
        }
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        let status = match &err {
            ToolError::NotFound(_) => StatusCode::NOT_FOUND,
            ToolError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ToolError::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ToolError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        };
        Self::new(status, err.to_string())
    }
}
