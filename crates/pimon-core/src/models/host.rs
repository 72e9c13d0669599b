//! 호스트 모델.

use serde::{Deserialize, Serialize};

use super::query::empty_as_none;

/// 등록된 모니터링 대상 노드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    /// 서버 할당 ID
    pub id: i64,
    /// 호스트명 (고유)
    pub hostname: String,
    /// IP 주소 (고유)
    pub ip_address: String,
    /// 역할 태그 (예: "web-server", "sensor")
    pub role: String,
    /// 최초 등록 시각 (Unix 초)
    pub created_at: i64,
    /// 마지막 등록/갱신 시각 (Unix 초)
    pub last_seen: i64,
}

/// 호스트 등록/수정 입력
///
/// 타임스탬프는 저장소가 현재 시각으로 채운다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHost {
    /// 호스트명
    #[serde(default)]
    pub hostname: String,
    /// IP 주소
    #[serde(default)]
    pub ip_address: String,
    /// 역할 태그
    #[serde(default)]
    pub role: String,
}

/// 호스트 목록 필터. 모든 필드가 비어 있으면 전체 조회
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostQueryParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id: Option<i64>,
    pub hostname: Option<String>,
    pub ip_address: Option<String>,
}

impl HostQueryParams {
    /// 적용할 호스트명 필터 (빈 문자열은 미지정)
    pub fn hostname_filter(&self) -> Option<&str> {
        self.hostname.as_deref().filter(|s| !s.is_empty())
    }

    /// 적용할 IP 주소 필터 (빈 문자열은 미지정)
    pub fn ip_address_filter(&self) -> Option<&str> {
        self.ip_address.as_deref().filter(|s| !s.is_empty())
    }

    /// 필터가 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.hostname_filter().is_none() && self.ip_address_filter().is_none()
    }
}
