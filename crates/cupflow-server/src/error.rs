// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use cupflow_store::{StoreError, StoreErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    ValidationFailed,
    NotFound,
    ChatUnavailable,
    StorageFailed,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::ValidationFailed => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ChatUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::StorageFailed | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wire shape of every error the API returns:
/// `{"error": {"code", "message", "details"}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Value::Null,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ValidationFailed, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        (status, Json(json!({ "error": self }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let code = match e.code {
            StoreErrorCode::NotFound => ApiErrorCode::NotFound,
            StoreErrorCode::Validation => ApiErrorCode::ValidationFailed,
            StoreErrorCode::Io | StoreErrorCode::Internal => ApiErrorCode::Internal,
        };
        Self::new(code, e.message)
    }
}

impl From<crate::adapters::ChatError> for ApiError {
    fn from(e: crate::adapters::ChatError) -> Self {
        Self::new(ApiErrorCode::ChatUnavailable, "chat bridge request failed")
            .with_details(json!({ "upstream": e.0 }))
    }
}

impl From<crate::adapters::AssetError> for ApiError {
    fn from(e: crate::adapters::AssetError) -> Self {
        Self::new(ApiErrorCode::StorageFailed, "asset storage failed")
            .with_details(json!({ "upstream": e.0 }))
    }
}
