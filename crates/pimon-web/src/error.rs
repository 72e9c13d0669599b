//! API 에러 처리.
//!
//! 모든 에러 응답 본문은 `{"error": ..., "details": ...}` 형태다.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pimon_core::error::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// API 에러
#[derive(Debug, Error)]
pub enum ApiError {
    /// 잘못된 요청 (파싱 실패, 검증 실패)
    #[error("잘못된 요청: {error} ({details})")]
    BadRequest { error: String, details: String },

    /// 리소스를 찾을 수 없음
    #[error("리소스를 찾을 수 없음: {error} ({details})")]
    NotFound { error: String, details: String },

    /// 경로는 있으나 메서드가 다름
    #[error("허용되지 않은 메서드")]
    MethodNotAllowed,

    /// 내부 서버 오류 (저장소 실패 포함)
    #[error("내부 서버 오류: {error} ({details})")]
    Internal { error: String, details: String },
}

/// 에러 응답 본문
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 요약
    pub error: String,
    /// 상세 (드라이버 메시지 원문 포함)
    pub details: String,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::BadRequest {
            error: error.into(),
            details: details.into(),
        }
    }

    pub fn not_found(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::NotFound {
            error: error.into(),
            details: details.into(),
        }
    }

    pub fn internal(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Internal {
            error: error.into(),
            details: details.into(),
        }
    }

    /// `CoreError`를 작업 문맥과 함께 변환
    ///
    /// 검증 실패 → 400, 미발견 → 404, 그 외 → 500 (`context`가 `error` 필드)
    pub fn from_core(context: &str, err: CoreError) -> Self {
        match err {
            CoreError::Validation { field, message } => {
                Self::bad_request(format!("Invalid {field}"), message)
            }
            CoreError::NotFound { resource_type, id } => Self::not_found(
                format!("{resource_type} not found"),
                format!("no {} with id {id}", resource_type.to_lowercase()),
            ),
            other => Self::internal(context, other.to_string()),
        }
    }

    /// HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let ApiError::Internal { error, details } = &self {
            error!("{error}: {details}");
        }

        let body = match self {
            ApiError::BadRequest { error, details }
            | ApiError::NotFound { error, details }
            | ApiError::Internal { error, details } => ErrorResponse { error, details },
            ApiError::MethodNotAllowed => ErrorResponse {
                error: "Method Not Allowed".to_string(),
                details: "The method is not allowed for the requested URL.".to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::from_core("Internal server error", err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("Invalid request body", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request("Invalid query parameters", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request("Invalid path parameter", rejection.body_text())
    }
}
