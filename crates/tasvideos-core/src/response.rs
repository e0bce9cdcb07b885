//! The JSON envelope every endpoint answers with.
//!
//! Handlers return `ApiResponse::success(data)`; failures are rendered by
//! `ApiError`, which wraps its `ErrorDetail` with [`ApiResponse::failure`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ErrorDetail;

/// `{"success": true, "data": ...}` or `{"success": false, "error": {...}}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Serialize the envelope with the given status.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl ApiResponse<()> {
    pub(crate) fn failure(detail: ErrorDetail) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(detail),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        self.with_status(StatusCode::OK)
    }
}
