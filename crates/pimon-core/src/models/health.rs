//! 헬스/준비 상태 모델.

use serde::{Deserialize, Serialize};

/// 컴포넌트 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// 단일 컴포넌트 점검 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    /// 실패 시 드라이버 에러 원문
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            error: Some(error.into()),
        }
    }
}

/// 연결 풀 통계
///
/// SQLite 어댑터는 단일 연결을 쓰므로 `max_open`은 항상 1이다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub open_connections: u32,
    pub in_use: u32,
    pub idle: u32,
    pub max_open: u32,
}

/// 테이블별 행 수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub hosts: i64,
    pub metrics: i64,
}

/// 상세 점검 결과
///
/// 통계/행 수 수집은 best-effort이며 실패 시 `None`으로 생략된다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedHealth {
    pub database: ComponentHealth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_stats: Option<PoolStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_counts: Option<TableCounts>,
}

impl DetailedHealth {
    /// 전체 상태. 연결 점검 결과만으로 결정
    pub fn status(&self) -> HealthStatus {
        self.database.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unhealthy_component_serializes_error() {
        let json = serde_json::to_value(ComponentHealth::unhealthy("database is locked")).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["error"], "database is locked");
    }

    #[test]
    fn omitted_sections_are_skipped() {
        let report = DetailedHealth {
            database: ComponentHealth::healthy(),
            database_stats: None,
            table_counts: Some(TableCounts {
                hosts: 2,
                metrics: 10,
            }),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("database_stats").is_none());
        assert_eq!(json["table_counts"]["metrics"], 10);
        assert!(json["database"].get("error").is_none());
    }
}
