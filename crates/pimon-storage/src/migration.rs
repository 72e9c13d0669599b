//! 스키마 마이그레이션.
//!
//! 버전별 DDL을 하나의 트랜잭션으로 적용하고 `schema_version`에 기록한다.
//! 중간에 실패한 버전은 통째로 롤백되어 다음 기동 시 다시 시도된다.

use rusqlite::Connection;
use tracing::{debug, info};

/// 버전별 마이그레이션 (버전, 설명, SQL)
const MIGRATIONS: &[(u32, &str, &str)] = &[
    (
        1,
        "hosts + system_metrics 테이블",
        "
        -- 모니터링 대상 호스트
        CREATE TABLE IF NOT EXISTS hosts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            hostname TEXT NOT NULL UNIQUE,
            ip_address TEXT NOT NULL UNIQUE,
            role TEXT NOT NULL DEFAULT ''
        );

        -- 호스트별 리소스 사용량 샘플
        CREATE TABLE IF NOT EXISTS system_metrics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            host_id INTEGER NOT NULL REFERENCES hosts(id),
            timestamp INTEGER NOT NULL,
            cpu_usage REAL NOT NULL,
            memory_usage_percent REAL NOT NULL,
            memory_total_bytes INTEGER NOT NULL DEFAULT 0,
            memory_used_bytes INTEGER NOT NULL DEFAULT 0,
            memory_available_bytes INTEGER NOT NULL DEFAULT 0,
            disk_usage_percent REAL NOT NULL,
            disk_total_bytes INTEGER NOT NULL DEFAULT 0,
            disk_used_bytes INTEGER NOT NULL DEFAULT 0,
            disk_available_bytes INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_metrics_timestamp ON system_metrics(timestamp);
        ",
    ),
    (
        2,
        "hosts.created_at, hosts.last_seen 컬럼",
        "
        ALTER TABLE hosts ADD COLUMN created_at INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE hosts ADD COLUMN last_seen INTEGER NOT NULL DEFAULT 0;
        ",
    ),
    (
        3,
        "system_metrics(host_id, timestamp) 인덱스",
        "
        CREATE INDEX IF NOT EXISTS idx_metrics_host_timestamp
            ON system_metrics(host_id, timestamp);
        ",
    ),
];

/// 현재 스키마 버전
const CURRENT_VERSION: u32 = 3;

/// 미적용 버전을 순서대로 적용
pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current = schema_version(conn)?;
    info!("현재 스키마 버전: {current}, 목표: {CURRENT_VERSION}");

    for (version, description, sql) in MIGRATIONS.iter().filter(|(v, _, _)| *v > current) {
        apply(conn, *version, description, sql)?;
    }

    Ok(())
}

/// 기록된 최고 버전 (없으면 0)
fn schema_version(conn: &Connection) -> Result<u32, rusqlite::Error> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
}

/// 한 버전을 트랜잭션 안에서 적용. 실패 시 DDL과 버전 기록 모두 롤백
fn apply(
    conn: &Connection,
    version: u32,
    description: &str,
    sql: &str,
) -> Result<(), rusqlite::Error> {
    debug!("마이그레이션 V{version} 실행: {description}");

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        rusqlite::params![version],
    )?;
    tx.commit()?;

    info!("마이그레이션 V{version} 완료");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_all_versions() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        // hosts 테이블 존재 확인
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='hosts'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        // system_metrics 테이블 존재 확인
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='system_metrics'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        // V2: last_seen 컬럼 존재 확인
        let has_last_seen: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('hosts') WHERE name='last_seen'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(has_last_seen, 1);

        // V3: 복합 인덱스 존재 확인
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name='idx_metrics_host_timestamp'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn migration_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, i64::from(CURRENT_VERSION));
    }

    #[test]
    fn versions_are_contiguous() {
        for (i, (version, _, _)) in MIGRATIONS.iter().enumerate() {
            assert_eq!(*version as usize, i + 1);
        }
        assert_eq!(MIGRATIONS.len() as u32, CURRENT_VERSION);
    }

    #[test]
    fn failed_migration_rolls_back() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let result = apply(
            &conn,
            CURRENT_VERSION + 1,
            "실패 케이스",
            "CREATE TABLE half_applied (x INTEGER);
             ALTER TABLE no_such_table ADD COLUMN y INTEGER;",
        );
        assert!(result.is_err());

        // 앞선 DDL과 버전 기록이 남지 않음
        let leftover: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name='half_applied'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(leftover, 0);
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }
}
