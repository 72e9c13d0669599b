//! 헬스 점검용 진단 메서드.

use async_trait::async_trait;
use pimon_core::error::CoreError;
use pimon_core::models::health::{PoolStats, TableCounts};
use pimon_core::ports::repository::HealthRepository;
use std::sync::TryLockError;

use super::{storage_err, SqliteStorage};

#[async_trait]
impl HealthRepository for SqliteStorage {
    async fn ping(&self) -> Result<(), CoreError> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(storage_err)?;
        Ok(())
    }

    async fn pool_stats(&self) -> Result<PoolStats, CoreError> {
        // 단일 연결: 다른 요청이 잠금을 잡고 있으면 사용 중
        let in_use = match self.conn.try_lock() {
            Ok(_) => 0,
            Err(TryLockError::WouldBlock) => 1,
            Err(TryLockError::Poisoned(e)) => {
                return Err(CoreError::Internal(format!("잠금 획득 실패: {e}")));
            }
        };

        Ok(PoolStats {
            open_connections: 1,
            in_use,
            idle: 1 - in_use,
            max_open: 1,
        })
    }

    async fn table_counts(&self) -> Result<TableCounts, CoreError> {
        let conn = self.lock()?;

        let hosts: i64 = conn
            .query_row("SELECT COUNT(*) FROM hosts", [], |row| row.get(0))
            .map_err(storage_err)?;
        let metrics: i64 = conn
            .query_row("SELECT COUNT(*) FROM system_metrics", [], |row| row.get(0))
            .map_err(storage_err)?;

        Ok(TableCounts { hosts, metrics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pimon_core::config::HostDeletePolicy;
    use pimon_core::models::host::NewHost;
    use pimon_core::ports::repository::HostRepository;

    #[tokio::test]
    async fn ping_and_counts() {
        let storage = SqliteStorage::open_in_memory(HostDeletePolicy::Restrict).unwrap();
        storage.ping().await.unwrap();

        HostRepository::create(
            &storage,
            &NewHost {
                hostname: "pi-01".to_string(),
                ip_address: "10.0.0.5".to_string(),
                role: "sensor".to_string(),
            },
        )
        .await
        .unwrap();

        let counts = storage.table_counts().await.unwrap();
        assert_eq!(counts, TableCounts { hosts: 1, metrics: 0 });
    }

    #[tokio::test]
    async fn pool_stats_reflect_lock_state() {
        let storage = SqliteStorage::open_in_memory(HostDeletePolicy::Restrict).unwrap();

        let idle = storage.pool_stats().await.unwrap();
        assert_eq!(idle.in_use, 0);
        assert_eq!(idle.idle, 1);
        assert_eq!(idle.max_open, 1);

        let _guard = storage.lock().unwrap();
        let busy = storage.pool_stats().await.unwrap();
        assert_eq!(busy.in_use, 1);
        assert_eq!(busy.idle, 0);
    }
}
