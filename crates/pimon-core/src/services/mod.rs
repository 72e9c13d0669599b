//! 서비스 레이어.
//!
//! 입력 검증과 기본값 적용 후 저장소 포트에 위임한다.
//!
//! - `host`: 호스트 등록(upsert), 조회, 수정, 삭제
//! - `metric`: 메트릭 수집 검증, 조회 기본값, 보존 정리
//! - `health`: 연결 점검 + best-effort 진단

pub mod health;
pub mod host;
pub mod metric;

pub use health::HealthService;
pub use host::HostService;
pub use metric::MetricService;
