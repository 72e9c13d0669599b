//! 도메인 모델.
//!
//! 영속 엔티티(`Host`, `SystemMetric`)와 요청별 쿼리 파라미터.

pub mod health;
pub mod host;
pub mod metric;
pub mod query;
