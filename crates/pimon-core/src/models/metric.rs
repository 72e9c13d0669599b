//! 시스템 메트릭 모델과 조회 파라미터.
//!
//! `MetricQueryParams::resolve`가 기본값(limit, 정렬, 30일 윈도우)을 적용해
//! 저장소가 그대로 사용할 `MetricFilter`를 만든다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::query::empty_as_none;
use crate::error::CoreError;

/// 기본 조회 개수
pub const DEFAULT_LIMIT: i64 = 100;

/// 최대 조회 개수
pub const MAX_LIMIT: i64 = 1000;

/// 기본 조회 윈도우 (30일, 초)
pub const DEFAULT_WINDOW_SECS: i64 = 86_400 * 30;

/// 호스트 한 대의 특정 시점 리소스 사용량
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetric {
    /// 서버 할당 ID
    pub id: i64,
    /// 소유 호스트 ID
    pub host_id: i64,
    /// 측정 시각 (Unix 초)
    pub timestamp: i64,
    /// CPU 사용률 (0-100)
    pub cpu_usage: f64,
    /// 메모리 사용률 (0-100)
    pub memory_usage_percent: f64,
    pub memory_total_bytes: u64,
    pub memory_used_bytes: u64,
    pub memory_available_bytes: u64,
    /// 디스크 사용률 (0-100)
    pub disk_usage_percent: f64,
    pub disk_total_bytes: u64,
    pub disk_used_bytes: u64,
    pub disk_available_bytes: u64,
}

/// 메트릭 수집 입력
///
/// 누락된 필드는 0으로 채워지며, `host_id` 누락은 서비스 검증에서 거부된다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSystemMetric {
    pub host_id: i64,
    pub timestamp: i64,
    pub cpu_usage: f64,
    pub memory_usage_percent: f64,
    pub memory_total_bytes: u64,
    pub memory_used_bytes: u64,
    pub memory_available_bytes: u64,
    pub disk_usage_percent: f64,
    pub disk_total_bytes: u64,
    pub disk_used_bytes: u64,
    pub disk_available_bytes: u64,
}

/// timestamp 정렬 방향
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL 키워드
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    /// 대소문자 무시. 빈 문자열은 기본값(DESC)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "" | "DESC" => Ok(SortOrder::Desc),
            "ASC" => Ok(SortOrder::Asc),
            _ => Err(CoreError::validation("order", "Must be 'ASC' or 'DESC'")),
        }
    }
}

/// 메트릭 목록 조회 파라미터 (HTTP 쿼리 바인딩)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricQueryParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub host_id: Option<i64>,
    /// 시작 시각 (포함, Unix 초)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start_time: Option<i64>,
    /// 종료 시각 (포함, Unix 초)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub end_time: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
    /// "ASC" / "DESC" (대소문자 무시)
    pub order: Option<String>,
}

/// 최신 메트릭 조회 파라미터. `host_id`가 없으면 전체 호스트 중 최신 1건
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricLatestQueryParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub host_id: Option<i64>,
}

/// 기본값이 적용된 메트릭 조회 조건
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFilter {
    pub host_id: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub limit: i64,
    pub order: SortOrder,
}

impl Default for MetricFilter {
    fn default() -> Self {
        Self {
            host_id: None,
            start_time: None,
            end_time: None,
            limit: DEFAULT_LIMIT,
            order: SortOrder::Desc,
        }
    }
}

/// limit 기본값/상한 적용. 0 이하는 미지정으로 취급
pub fn normalize_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(n) if n > MAX_LIMIT => MAX_LIMIT,
        Some(n) if n > 0 => n,
        _ => DEFAULT_LIMIT,
    }
}

impl MetricQueryParams {
    /// 기본값 적용
    ///
    /// - `limit`: 미지정/0 이하 → 100, 1000 초과 → 1000
    /// - `order`: 미지정 → DESC, 그 외 ASC/DESC만 허용
    /// - `end_time`: 미지정 → `now`
    /// - `start_time`: 미지정 → `end_time - 30일`
    ///
    /// 0 값은 미지정으로 취급한다.
    pub fn resolve(&self, now: i64) -> Result<MetricFilter, CoreError> {
        let order = match self.order.as_deref() {
            Some(raw) => raw.parse::<SortOrder>()?,
            None => SortOrder::Desc,
        };

        let end_time = self.end_time.filter(|t| *t != 0).unwrap_or(now);
        let start_time = match self.start_time.filter(|t| *t != 0) {
            Some(t) => t,
            None => end_time
                .checked_sub(DEFAULT_WINDOW_SECS)
                .ok_or_else(|| CoreError::validation("end_time", "end_time is out of range"))?,
        };

        Ok(MetricFilter {
            host_id: self.host_id.filter(|id| *id != 0),
            start_time: Some(start_time),
            end_time: Some(end_time),
            limit: normalize_limit(self.limit),
            order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(normalize_limit(None), 100);
        assert_eq!(normalize_limit(Some(0)), 100);
        assert_eq!(normalize_limit(Some(-5)), 100);
        assert_eq!(normalize_limit(Some(250)), 250);
        assert_eq!(normalize_limit(Some(1000)), 1000);
        assert_eq!(normalize_limit(Some(5000)), 1000);
    }

    #[test]
    fn order_is_case_insensitive() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("Desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!("".parse::<SortOrder>().unwrap(), SortOrder::Desc);
    }

    #[test]
    fn invalid_order_names_allowed_values() {
        let err = "invalid".parse::<SortOrder>().unwrap_err();
        match err {
            CoreError::Validation { field, message } => {
                assert_eq!(field, "order");
                assert!(message.contains("'ASC' or 'DESC'"));
            }
            other => panic!("예상치 못한 에러: {other:?}"),
        }
    }

    #[test]
    fn resolve_applies_thirty_day_window() {
        let filter = MetricQueryParams::default().resolve(NOW).unwrap();
        assert_eq!(filter.end_time, Some(NOW));
        assert_eq!(filter.start_time, Some(NOW - 2_592_000));
        assert_eq!(filter.limit, 100);
        assert_eq!(filter.order, SortOrder::Desc);
        assert_eq!(filter.host_id, None);
    }

    #[test]
    fn resolve_window_follows_explicit_end() {
        let params = MetricQueryParams {
            end_time: Some(NOW - 100),
            ..Default::default()
        };
        let filter = params.resolve(NOW).unwrap();
        assert_eq!(filter.start_time, Some(NOW - 100 - DEFAULT_WINDOW_SECS));
    }

    #[test]
    fn resolve_rejects_end_time_without_room_for_window() {
        let params = MetricQueryParams {
            end_time: Some(i64::MIN + 10),
            ..Default::default()
        };
        match params.resolve(NOW).unwrap_err() {
            CoreError::Validation { field, .. } => assert_eq!(field, "end_time"),
            other => panic!("예상치 못한 에러: {other:?}"),
        }

        // start_time이 명시되면 윈도우 계산이 필요 없음
        let params = MetricQueryParams {
            start_time: Some(1),
            end_time: Some(i64::MIN + 10),
            ..Default::default()
        };
        assert!(params.resolve(NOW).is_ok());
    }

    #[test]
    fn empty_query_values_are_unset() {
        let params: MetricQueryParams = serde_json::from_str(
            r#"{"host_id":"","start_time":"","end_time":"","limit":"","order":""}"#,
        )
        .unwrap();
        let filter = params.resolve(NOW).unwrap();
        assert_eq!(filter, MetricQueryParams::default().resolve(NOW).unwrap());
    }

    #[test]
    fn resolve_keeps_explicit_values() {
        let params = MetricQueryParams {
            host_id: Some(4),
            start_time: Some(10),
            end_time: Some(20),
            limit: Some(5000),
            order: Some("asc".to_string()),
        };
        let filter = params.resolve(NOW).unwrap();
        assert_eq!(
            filter,
            MetricFilter {
                host_id: Some(4),
                start_time: Some(10),
                end_time: Some(20),
                limit: 1000,
                order: SortOrder::Asc,
            }
        );
    }

    #[test]
    fn resolve_rejects_bad_order() {
        let params = MetricQueryParams {
            order: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(params.resolve(NOW).is_err());
    }

    #[test]
    fn missing_metric_fields_default_to_zero() {
        let metric: NewSystemMetric = serde_json::from_str(r#"{"cpu_usage": 12.5}"#).unwrap();
        assert_eq!(metric.host_id, 0);
        assert_eq!(metric.cpu_usage, 12.5);
    }
}
