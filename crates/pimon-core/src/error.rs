//! PIMON 핵심 에러 타입.
//!
//! 저장소/HTTP 어댑터는 이 타입을 그대로 전파하거나 자체 에러로 변환한다.

use thiserror::Error;

/// 코어 레이어 에러.
///
/// 입력 검증, 미발견, 저장소 실패를 구분한다. 저장소 실패는 드라이버
/// 메시지를 가공하지 않고 그대로 담는다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 리소스를 찾을 수 없음
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "Host", "Metric")
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// 저장소 실패 (연결 끊김, 제약 조건 위반 등). 드라이버 메시지 원문
    #[error("{0}")]
    Storage(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 미발견 에러 생성 헬퍼
    pub fn not_found(resource_type: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.to_string(),
        }
    }
}
