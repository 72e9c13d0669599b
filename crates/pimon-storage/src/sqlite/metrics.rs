//! 메트릭 저장소 메서드.
//!
//! 정렬 방향은 `SortOrder` 열거형에서만 가져오고, 나머지 값은 모두
//! 위치 파라미터로 바인딩한다.

use async_trait::async_trait;
use pimon_core::error::CoreError;
use pimon_core::models::metric::{MetricFilter, NewSystemMetric, SystemMetric};
use pimon_core::ports::repository::MetricRepository;
use rusqlite::types::Value;
use rusqlite::Row;
use tracing::debug;

use super::{storage_err, SqliteStorage};

const METRIC_COLUMNS: &str = "id, host_id, timestamp, cpu_usage, memory_usage_percent, \
     memory_total_bytes, memory_used_bytes, memory_available_bytes, disk_usage_percent, \
     disk_total_bytes, disk_used_bytes, disk_available_bytes";

/// 호스트별 최신 1건. 같은 시각이 여러 건이면 가장 큰 id
const LATEST_BY_HOST_SQL: &str = "
    SELECT m.id, m.host_id, m.timestamp, m.cpu_usage, m.memory_usage_percent,
           m.memory_total_bytes, m.memory_used_bytes, m.memory_available_bytes,
           m.disk_usage_percent, m.disk_total_bytes, m.disk_used_bytes,
           m.disk_available_bytes
    FROM system_metrics m
    JOIN (
        SELECT host_id, MAX(timestamp) AS max_ts
        FROM system_metrics
        GROUP BY host_id
    ) latest ON m.host_id = latest.host_id AND m.timestamp = latest.max_ts
    WHERE NOT EXISTS (
        SELECT 1 FROM system_metrics d
        WHERE d.host_id = m.host_id AND d.timestamp = m.timestamp AND d.id > m.id
    )
    ORDER BY m.host_id";

fn row_to_metric(row: &Row<'_>) -> rusqlite::Result<SystemMetric> {
    Ok(SystemMetric {
        id: row.get(0)?,
        host_id: row.get(1)?,
        timestamp: row.get(2)?,
        cpu_usage: row.get(3)?,
        memory_usage_percent: row.get(4)?,
        memory_total_bytes: row.get(5)?,
        memory_used_bytes: row.get(6)?,
        memory_available_bytes: row.get(7)?,
        disk_usage_percent: row.get(8)?,
        disk_total_bytes: row.get(9)?,
        disk_used_bytes: row.get(10)?,
        disk_available_bytes: row.get(11)?,
    })
}

#[async_trait]
impl MetricRepository for SqliteStorage {
    async fn find_by_filters(&self, filter: &MetricFilter) -> Result<Vec<SystemMetric>, CoreError> {
        let mut sql = format!("SELECT {METRIC_COLUMNS} FROM system_metrics WHERE 1=1");
        let mut values: Vec<Value> = Vec::new();

        if let Some(host_id) = filter.host_id {
            sql.push_str(" AND host_id = ?");
            values.push(Value::Integer(host_id));
        }
        if let Some(start) = filter.start_time {
            sql.push_str(" AND timestamp >= ?");
            values.push(Value::Integer(start));
        }
        if let Some(end) = filter.end_time {
            sql.push_str(" AND timestamp <= ?");
            values.push(Value::Integer(end));
        }
        sql.push_str(&format!(" ORDER BY timestamp {} LIMIT ?", filter.order.as_sql()));
        values.push(Value::Integer(filter.limit));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql).map_err(storage_err)?;
        let records = stmt
            .query_map(rusqlite::params_from_iter(values.iter()), row_to_metric)
            .map_err(storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_err)?;

        debug!(
            "메트릭 조회: host_id={:?}, order={}, limit={}, rows={}",
            filter.host_id,
            filter.order,
            filter.limit,
            records.len()
        );
        Ok(records)
    }

    async fn find_latest(&self, host_id: Option<i64>) -> Result<Option<SystemMetric>, CoreError> {
        let conn = self.lock()?;

        let result = match host_id {
            Some(host_id) => conn.query_row(
                &format!(
                    "SELECT {METRIC_COLUMNS} FROM system_metrics WHERE host_id = ?1
                     ORDER BY timestamp DESC, id DESC LIMIT 1"
                ),
                rusqlite::params![host_id],
                row_to_metric,
            ),
            None => conn.query_row(
                &format!(
                    "SELECT {METRIC_COLUMNS} FROM system_metrics
                     ORDER BY timestamp DESC, id DESC LIMIT 1"
                ),
                [],
                row_to_metric,
            ),
        };

        match result {
            Ok(metric) => Ok(Some(metric)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(storage_err(e)),
        }
    }

    async fn find_latest_by_host(&self) -> Result<Vec<SystemMetric>, CoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(LATEST_BY_HOST_SQL).map_err(storage_err)?;
        let records = stmt
            .query_map([], row_to_metric)
            .map_err(storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_err)?;

        debug!("호스트별 최신 메트릭: {}건", records.len());
        Ok(records)
    }

    async fn create(&self, metric: &NewSystemMetric) -> Result<i64, CoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO system_metrics (
                host_id, timestamp, cpu_usage,
                memory_usage_percent, memory_total_bytes, memory_used_bytes, memory_available_bytes,
                disk_usage_percent, disk_total_bytes, disk_used_bytes, disk_available_bytes
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                metric.host_id,
                metric.timestamp,
                metric.cpu_usage,
                metric.memory_usage_percent,
                metric.memory_total_bytes,
                metric.memory_used_bytes,
                metric.memory_available_bytes,
                metric.disk_usage_percent,
                metric.disk_total_bytes,
                metric.disk_used_bytes,
                metric.disk_available_bytes,
            ],
        )
        .map_err(storage_err)?;

        Ok(conn.last_insert_rowid())
    }

    async fn delete_older_than(&self, cutoff: i64) -> Result<u64, CoreError> {
        let conn = self.lock()?;

        let deleted = conn
            .execute(
                "DELETE FROM system_metrics WHERE timestamp < ?1",
                rusqlite::params![cutoff],
            )
            .map_err(storage_err)?;

        debug!("메트릭 보존 정리: cutoff={}, deleted={}", cutoff, deleted);
        Ok(deleted as u64)
    }
}
