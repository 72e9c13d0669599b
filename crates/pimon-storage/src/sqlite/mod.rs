//! SQLite 저장소 어댑터.
//!
//! `HostRepository` + `MetricRepository` + `HealthRepository` 포트 구현.
//!
//! # 모듈 구조
//! - `hosts`: 호스트 필터 조회, upsert, 삭제 정책
//! - `metrics`: 메트릭 필터 조회, 최신 조회, 보존 정리
//! - `health`: 연결 점검, 연결 통계, 테이블 행 수

mod health;
mod hosts;
mod metrics;

use pimon_core::config::HostDeletePolicy;
use pimon_core::error::CoreError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::migration;

/// SQLite 저장소
///
/// 단일 연결을 뮤텍스로 보호한다. 모든 호출은 잠금 획득 후 구문 하나
/// (cascade 삭제는 짧은 트랜잭션 하나)를 실행하고 결과를 소유값으로 복사한 뒤 반환한다.
pub struct SqliteStorage {
    pub(super) conn: Mutex<Connection>,
    pub(super) host_delete_policy: HostDeletePolicy,
}

impl SqliteStorage {
    /// 파일 기반 SQLite 저장소 생성. 상위 디렉토리가 없으면 생성
    pub fn open(path: &Path, host_delete_policy: HostDeletePolicy) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("DB 디렉토리 생성: {}", parent.display());
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| CoreError::Storage(format!("SQLite 열기 실패: {e}")))?;

        // 동시 읽기/쓰기 성능 PRAGMA
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA busy_timeout=5000;
            ",
        )
        .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        let storage = Self::init(conn, host_delete_policy)?;
        info!(
            "SQLite 저장소 초기화: {} (삭제 정책: {:?})",
            path.display(),
            host_delete_policy
        );
        Ok(storage)
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory(host_delete_policy: HostDeletePolicy) -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Storage(format!("인메모리 SQLite 생성 실패: {e}")))?;
        Self::init(conn, host_delete_policy)
    }

    fn init(conn: Connection, host_delete_policy: HostDeletePolicy) -> Result<Self, CoreError> {
        // 외래 키 검사는 연결 단위 설정
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
            host_delete_policy,
        })
    }

    /// 설정된 호스트 삭제 정책
    pub fn host_delete_policy(&self) -> HostDeletePolicy {
        self.host_delete_policy
    }

    /// 연결 잠금 획득
    pub(super) fn lock(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))
    }
}

/// 드라이버 에러를 메시지 그대로 저장소 에러로 변환
pub(super) fn storage_err(e: rusqlite::Error) -> CoreError {
    CoreError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_keys_enabled_in_memory() {
        let storage = SqliteStorage::open_in_memory(HostDeletePolicy::Restrict).unwrap();
        let conn = storage.lock().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pimon.db");

        let storage = SqliteStorage::open(&path, HostDeletePolicy::Cascade).unwrap();
        assert!(path.exists());
        assert_eq!(storage.host_delete_policy(), HostDeletePolicy::Cascade);
    }
}
