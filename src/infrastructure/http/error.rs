//! HTTP Error Handling
//!
//! 所有错误以真实 HTTP 状态码返回，响应体为 `{"detail": "..."}`

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    /// 不区分错误类型，一律作为服务端错误返回原始消息
    pub fn internal(err: impl std::fmt::Display) -> Self {
        ApiError::Internal(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Bad request");
                msg
            }
            ApiError::Internal(msg) => {
                tracing::error!(status = status.as_u16(), error = %msg, "Internal server error");
                msg
            }
        };

        (status, Json(ErrorResponse::new(detail))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(format!("Internal server error: {}", other)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::EngineError;

    #[test]
    fn test_validation_maps_to_400_with_raw_message() {
        let err: ApiError = ApplicationError::from(EngineError::Validation(
            "Question too vague".to_string(),
        ))
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Question too vague"));
    }

    #[test]
    fn test_other_errors_are_wrapped_500() {
        let err: ApiError = ApplicationError::from(EngineError::Timeout).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            matches!(err, ApiError::Internal(ref m) if m == "Internal server error: Request timeout")
        );
    }

    #[test]
    fn test_internal_keeps_raw_message() {
        let err = ApiError::internal(ApplicationError::validation("bad limit"));
        assert!(matches!(err, ApiError::Internal(ref m) if m == "bad limit"));
    }
}
