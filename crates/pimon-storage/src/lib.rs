//! # pimon-storage
//!
//! SQLite 저장소 어댑터.
//! 호스트/메트릭 저장과 필터 조회, 스키마 마이그레이션,
//! 보존 정리(오래된 메트릭 삭제)를 담당한다.
//!
//! ## 모듈
//! - `sqlite`: `HostRepository` / `MetricRepository` / `HealthRepository` 구현
//! - `migration`: 스키마 마이그레이션

pub mod migration;
pub mod sqlite;
