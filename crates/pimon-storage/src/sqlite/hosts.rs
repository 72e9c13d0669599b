//! 호스트 저장소 메서드.
//!
//! 필터 조회는 `WHERE 1=1`에서 시작해 지정된 필드마다 `AND` 조건을 붙이고,
//! 값은 모두 위치 파라미터로 바인딩한다.

use async_trait::async_trait;
use chrono::Utc;
use pimon_core::config::HostDeletePolicy;
use pimon_core::error::CoreError;
use pimon_core::models::host::{Host, HostQueryParams, NewHost};
use pimon_core::ports::repository::HostRepository;
use rusqlite::types::Value;
use rusqlite::Row;
use tracing::debug;

use super::{storage_err, SqliteStorage};

const HOST_COLUMNS: &str = "id, hostname, ip_address, role, created_at, last_seen";

fn row_to_host(row: &Row<'_>) -> rusqlite::Result<Host> {
    Ok(Host {
        id: row.get(0)?,
        hostname: row.get(1)?,
        ip_address: row.get(2)?,
        role: row.get(3)?,
        created_at: row.get(4)?,
        last_seen: row.get(5)?,
    })
}

#[async_trait]
impl HostRepository for SqliteStorage {
    async fn find_by_filters(&self, params: &HostQueryParams) -> Result<Vec<Host>, CoreError> {
        let mut sql = format!("SELECT {HOST_COLUMNS} FROM hosts WHERE 1=1");
        let mut values: Vec<Value> = Vec::new();

        if let Some(id) = params.id {
            sql.push_str(" AND id = ?");
            values.push(Value::Integer(id));
        }
        if let Some(hostname) = params.hostname_filter() {
            sql.push_str(" AND hostname = ?");
            values.push(Value::Text(hostname.to_string()));
        }
        if let Some(ip) = params.ip_address_filter() {
            sql.push_str(" AND ip_address = ?");
            values.push(Value::Text(ip.to_string()));
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql).map_err(storage_err)?;
        let hosts = stmt
            .query_map(rusqlite::params_from_iter(values.iter()), row_to_host)
            .map_err(storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_err)?;

        debug!("호스트 조회: filters={}, rows={}", values.len(), hosts.len());
        Ok(hosts)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Host>, CoreError> {
        let conn = self.lock()?;

        let result = conn.query_row(
            &format!("SELECT {HOST_COLUMNS} FROM hosts WHERE id = ?1"),
            rusqlite::params![id],
            row_to_host,
        );

        match result {
            Ok(host) => Ok(Some(host)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(storage_err(e)),
        }
    }

    async fn create(&self, host: &NewHost) -> Result<i64, CoreError> {
        let now = Utc::now().timestamp();
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO hosts (hostname, ip_address, role, created_at, last_seen)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            rusqlite::params![host.hostname, host.ip_address, host.role, now],
        )
        .map_err(storage_err)?;

        let id = conn.last_insert_rowid();
        debug!("호스트 생성: id={}, hostname={}", id, host.hostname);
        Ok(id)
    }

    async fn upsert(&self, host: &NewHost) -> Result<i64, CoreError> {
        let now = Utc::now().timestamp();
        let conn = self.lock()?;

        // hostname 충돌을 먼저 처리하고, 그 다음 ip_address 충돌 처리
        let id: i64 = conn
            .query_row(
                "INSERT INTO hosts (hostname, ip_address, role, created_at, last_seen)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(hostname) DO UPDATE SET
                     role = excluded.role,
                     last_seen = excluded.last_seen
                 ON CONFLICT(ip_address) DO UPDATE SET
                     role = excluded.role,
                     last_seen = excluded.last_seen
                 RETURNING id",
                rusqlite::params![host.hostname, host.ip_address, host.role, now],
                |row| row.get(0),
            )
            .map_err(storage_err)?;

        debug!("호스트 upsert: id={}, hostname={}", id, host.hostname);
        Ok(id)
    }

    async fn update(&self, id: i64, host: &NewHost) -> Result<u64, CoreError> {
        let now = Utc::now().timestamp();
        let conn = self.lock()?;

        let affected = conn
            .execute(
                "UPDATE hosts SET role = ?1, last_seen = ?2 WHERE id = ?3",
                rusqlite::params![host.role, now, id],
            )
            .map_err(storage_err)?;

        debug!("호스트 갱신: id={}, affected={}", id, affected);
        Ok(affected as u64)
    }

    async fn delete(&self, id: i64) -> Result<u64, CoreError> {
        let mut conn = self.lock()?;

        let affected = match self.host_delete_policy {
            HostDeletePolicy::Restrict => conn
                .execute("DELETE FROM hosts WHERE id = ?1", rusqlite::params![id])
                .map_err(storage_err)?,
            HostDeletePolicy::Cascade => {
                let tx = conn.transaction().map_err(storage_err)?;
                let metrics = tx
                    .execute(
                        "DELETE FROM system_metrics WHERE host_id = ?1",
                        rusqlite::params![id],
                    )
                    .map_err(storage_err)?;
                let hosts = tx
                    .execute("DELETE FROM hosts WHERE id = ?1", rusqlite::params![id])
                    .map_err(storage_err)?;
                tx.commit().map_err(storage_err)?;
                debug!("호스트 메트릭 연쇄 삭제: host_id={}, metrics={}", id, metrics);
                hosts
            }
        };

        debug!("호스트 삭제: id={}, affected={}", id, affected);
        Ok(affected as u64)
    }
}
