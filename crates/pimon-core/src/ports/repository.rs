//! 저장소 포트.
//!
//! 구현: `pimon-storage` crate (rusqlite)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::health::{PoolStats, TableCounts};
use crate::models::host::{Host, HostQueryParams, NewHost};
use crate::models::metric::{MetricFilter, NewSystemMetric, SystemMetric};

/// 호스트 저장소
#[async_trait]
pub trait HostRepository: Send + Sync {
    /// 필터 조회. id → hostname → ip_address 순서로 AND 조건 추가, 정렬 없음
    async fn find_by_filters(&self, params: &HostQueryParams) -> Result<Vec<Host>, CoreError>;

    /// ID로 단건 조회
    async fn find_by_id(&self, id: i64) -> Result<Option<Host>, CoreError>;

    /// 신규 삽입. hostname/ip_address 충돌은 저장소 에러로 그대로 반환
    async fn create(&self, host: &NewHost) -> Result<i64, CoreError>;

    /// hostname 또는 ip_address가 일치하면 role/last_seen 갱신, 없으면 삽입.
    /// 단일 구문으로 실행되며 기존/신규 ID를 반환
    async fn upsert(&self, host: &NewHost) -> Result<i64, CoreError>;

    /// role/last_seen 갱신. 영향받은 행 수 반환 (0은 에러 아님)
    async fn update(&self, id: i64, host: &NewHost) -> Result<u64, CoreError>;

    /// 삭제. 영향받은 행 수 반환
    async fn delete(&self, id: i64) -> Result<u64, CoreError>;
}

/// 메트릭 저장소
#[async_trait]
pub trait MetricRepository: Send + Sync {
    /// 필터 조회 (`ORDER BY timestamp <dir> LIMIT n`)
    async fn find_by_filters(&self, filter: &MetricFilter) -> Result<Vec<SystemMetric>, CoreError>;

    /// 최신 1건. `host_id`가 없으면 전체 호스트 대상
    async fn find_latest(&self, host_id: Option<i64>) -> Result<Option<SystemMetric>, CoreError>;

    /// 호스트별 최신 1건씩
    async fn find_latest_by_host(&self) -> Result<Vec<SystemMetric>, CoreError>;

    /// 단건 삽입. 새 ID 반환
    async fn create(&self, metric: &NewSystemMetric) -> Result<i64, CoreError>;

    /// `timestamp < cutoff`인 행 삭제. 삭제된 행 수 반환
    async fn delete_older_than(&self, cutoff: i64) -> Result<u64, CoreError>;
}

/// 헬스 점검용 저장소 진단
#[async_trait]
pub trait HealthRepository: Send + Sync {
    /// 연결 확인
    async fn ping(&self) -> Result<(), CoreError>;

    /// 연결 풀 통계
    async fn pool_stats(&self) -> Result<PoolStats, CoreError>;

    /// hosts / system_metrics 행 수
    async fn table_counts(&self) -> Result<TableCounts, CoreError>;
}
