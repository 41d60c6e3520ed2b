//! HTTP Error Handling
//!
//! 错误统一转换为 `{code, message}`，状态码区分错误类别

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// 错误码定义
pub mod code {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const BUSY: &str = "BUSY";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Busy(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Busy(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => code::BAD_REQUEST,
            ApiError::Busy(_) => code::BUSY,
            ApiError::Internal(_) => code::INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(code = code, error = %msg, "Bad request");
                msg
            }
            ApiError::Busy(msg) => {
                tracing::info!(code = code, "Busy");
                msg
            }
            ApiError::Internal(msg) => {
                tracing::error!(code = code, error = %msg, "Internal server error");
                msg
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::MissingField(_)
            | ApplicationError::InvalidField { .. }
            | ApplicationError::InvalidEncoding { .. } => ApiError::BadRequest(e.to_string()),
            ApplicationError::Busy => ApiError::Busy(e.to_string()),
            ApplicationError::EngineError(_)
            | ApplicationError::StorageError(_)
            | ApplicationError::InternalError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_mapping() {
        let cases = [
            (ApplicationError::missing("text"), StatusCode::BAD_REQUEST, code::BAD_REQUEST),
            (
                ApplicationError::InvalidEncoding {
                    field: "prompt_audio".to_string(),
                    reason: "bad".to_string(),
                },
                StatusCode::BAD_REQUEST,
                code::BAD_REQUEST,
            ),
            (ApplicationError::Busy, StatusCode::TOO_MANY_REQUESTS, code::BUSY),
            (
                ApplicationError::EngineError("oom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                code::INTERNAL_ERROR,
            ),
            (
                ApplicationError::StorageError("disk full".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                code::INTERNAL_ERROR,
            ),
        ];

        for (err, status, code) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status(), status);
            assert_eq!(api.code(), code);
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::Busy("Busy: another synthesis is in progress".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.code, "BUSY");
        assert!(parsed.message.contains("in progress"));
    }
}
