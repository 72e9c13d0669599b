//! 헬스 서비스.

use std::sync::Arc;
use tracing::warn;

use crate::models::health::{ComponentHealth, DetailedHealth};
use crate::ports::repository::HealthRepository;

/// 저장소 연결 점검 서비스
pub struct HealthService {
    repo: Arc<dyn HealthRepository>,
}

impl HealthService {
    /// 새 헬스 서비스 생성
    pub fn new(repo: Arc<dyn HealthRepository>) -> Self {
        Self { repo }
    }

    /// 연결 점검
    pub async fn check(&self) -> ComponentHealth {
        match self.repo.ping().await {
            Ok(()) => ComponentHealth::healthy(),
            Err(e) => {
                warn!("DB 연결 점검 실패: {e}");
                ComponentHealth::unhealthy(e.to_string())
            }
        }
    }

    /// 상세 점검. 연결이 정상일 때만 통계/행 수를 수집하며 실패한 항목은 생략
    pub async fn detailed(&self) -> DetailedHealth {
        let database = self.check().await;
        if !database.status.is_healthy() {
            return DetailedHealth {
                database,
                database_stats: None,
                table_counts: None,
            };
        }

        let database_stats = match self.repo.pool_stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("연결 풀 통계 수집 실패: {e}");
                None
            }
        };

        let table_counts = match self.repo.table_counts().await {
            Ok(counts) => Some(counts),
            Err(e) => {
                warn!("테이블 행 수 수집 실패: {e}");
                None
            }
        };

        DetailedHealth {
            database,
            database_stats,
            table_counts,
        }
    }
}
