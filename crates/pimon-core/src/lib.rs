//! # pimon-core
//!
//! PIMON 도메인 모델, 포트(trait) 정의, 서비스 레이어, 에러 타입.
//! 저장소 어댑터와 HTTP 어댑터가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 호스트/메트릭/헬스 데이터 구조체 (serde Serialize/Deserialize)
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`services`] — 입력 검증, 기본값 적용, upsert 규칙
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 서버 설정 구조체
//! - [`config_manager`] — 설정 로드 (파일 + 환경변수)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
pub mod services;
