//! 메트릭 서비스.
//!
//! 수집 전 검증(host_id, 사용률 범위)과 조회 기본값 적용, 보존 정리.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::models::metric::{MetricFilter, MetricQueryParams, NewSystemMetric, SystemMetric};
use crate::ports::repository::MetricRepository;

/// 하루 (초)
const SECS_PER_DAY: i64 = 86_400;

/// 메트릭 수집/조회 서비스
pub struct MetricService {
    repo: Arc<dyn MetricRepository>,
}

impl MetricService {
    /// 새 메트릭 서비스 생성
    pub fn new(repo: Arc<dyn MetricRepository>) -> Self {
        Self { repo }
    }

    /// 메트릭 1건 수집. 검증 실패 시 저장소를 호출하지 않는다
    pub async fn create(&self, metric: &NewSystemMetric) -> Result<i64, CoreError> {
        validate_metric(metric)?;
        let id = self.repo.create(metric).await?;
        debug!(
            "메트릭 저장: id={}, host_id={}, ts={}",
            id, metric.host_id, metric.timestamp
        );
        Ok(id)
    }

    /// 기본값을 적용해 조회. 적용된 필터도 함께 반환
    pub async fn list(
        &self,
        params: &MetricQueryParams,
    ) -> Result<(Vec<SystemMetric>, MetricFilter), CoreError> {
        let filter = params.resolve(Utc::now().timestamp())?;
        let records = self.repo.find_by_filters(&filter).await?;
        Ok((records, filter))
    }

    /// 최신 1건. 없으면 `None`
    pub async fn latest(&self, host_id: Option<i64>) -> Result<Option<SystemMetric>, CoreError> {
        if let Some(id) = host_id {
            validate_host_id(id)?;
        }
        self.repo.find_latest(host_id).await
    }

    /// 호스트별 최신 1건씩
    pub async fn latest_by_host(&self) -> Result<Vec<SystemMetric>, CoreError> {
        self.repo.find_latest_by_host().await
    }

    /// `cutoff`(Unix 초) 이전 메트릭 삭제. 스케줄러 없이 외부에서 호출
    pub async fn purge_older_than(&self, cutoff: i64) -> Result<u64, CoreError> {
        let removed = self.repo.delete_older_than(cutoff).await?;
        info!("메트릭 보존 정리: cutoff={}, 삭제={}", cutoff, removed);
        Ok(removed)
    }

    /// `now` 기준 `days`일 이전 메트릭 삭제
    pub async fn purge_older_than_days(&self, days: u32, now: i64) -> Result<u64, CoreError> {
        if days == 0 {
            return Err(CoreError::validation(
                "older_than_days",
                "retention must be at least 1 day",
            ));
        }
        self.purge_older_than(now - i64::from(days) * SECS_PER_DAY).await
    }
}

fn validate_host_id(host_id: i64) -> Result<(), CoreError> {
    if host_id <= 0 {
        return Err(CoreError::validation("host_id", "invalid host ID"));
    }
    Ok(())
}

fn validate_percent(field: &str, label: &str, value: f64) -> Result<(), CoreError> {
    // NaN은 범위 비교에서 항상 false
    if !(0.0..=100.0).contains(&value) {
        return Err(CoreError::validation(
            field,
            format!("{label} usage must be between 0 and 100"),
        ));
    }
    Ok(())
}

/// SQLite INTEGER는 부호 있는 64비트
fn validate_bytes(field: &str, value: u64) -> Result<(), CoreError> {
    if i64::try_from(value).is_err() {
        return Err(CoreError::validation(
            field,
            format!("{field} must not exceed {}", i64::MAX),
        ));
    }
    Ok(())
}

/// 수집 입력 검증
pub fn validate_metric(metric: &NewSystemMetric) -> Result<(), CoreError> {
    validate_host_id(metric.host_id)?;
    validate_percent("cpu_usage", "CPU", metric.cpu_usage)?;
    validate_percent("memory_usage_percent", "memory", metric.memory_usage_percent)?;
    validate_percent("disk_usage_percent", "disk", metric.disk_usage_percent)?;

    for (field, value) in [
        ("memory_total_bytes", metric.memory_total_bytes),
        ("memory_used_bytes", metric.memory_used_bytes),
        ("memory_available_bytes", metric.memory_available_bytes),
        ("disk_total_bytes", metric.disk_total_bytes),
        ("disk_used_bytes", metric.disk_used_bytes),
        ("disk_available_bytes", metric.disk_available_bytes),
    ] {
        validate_bytes(field, value)?;
    }
    Ok(())
}
