//! API 핸들러 모듈.

pub mod health;
pub mod hosts;
pub mod metrics;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// 목록 응답 메타데이터
#[derive(Debug, Serialize, Deserialize)]
pub struct Meta {
    /// 반환된 항목 수
    pub count: usize,
    /// 적용된 limit (메트릭 목록만)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

/// 생성 응답 (201)
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

/// 단순 메시지 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 등록되지 않은 경로
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found", "The requested URL was not found.")
}

/// 경로는 있으나 허용되지 않은 메서드
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
