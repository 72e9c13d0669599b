//! 포트 인터페이스.
//!
//! 서비스 레이어가 의존하는 데이터 접근 능력. 구현은 `pimon-storage`.

pub mod repository;
