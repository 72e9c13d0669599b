//! 헬스 점검 핸들러.
//!
//! 연결 점검 실패 시에만 503. 상세 점검의 통계/행 수는 실패하면 생략된다.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pimon_core::models::health::{DetailedHealth, HealthStatus};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// 기본 점검 항목
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    /// "healthy" 또는 "unhealthy: <에러>"
    pub database: String,
}

/// 기본 점검 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// RFC3339
    pub timestamp: String,
    pub checks: HealthChecks,
}

/// 상세 점검 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    pub status: HealthStatus,
    pub timestamp: String,
    #[serde(flatten)]
    pub report: DetailedHealth,
}

fn status_code(status: HealthStatus) -> StatusCode {
    if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// 연결 점검
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.health.check().await;

    let summary = match &database.error {
        Some(err) => format!("unhealthy: {err}"),
        None => "healthy".to_string(),
    };

    (
        status_code(database.status),
        Json(HealthResponse {
            status: database.status,
            timestamp: Utc::now().to_rfc3339(),
            checks: HealthChecks { database: summary },
        }),
    )
}

/// 상세 점검 (연결 통계, 테이블 행 수)
///
/// GET /health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> (StatusCode, Json<DetailedHealthResponse>) {
    let report = state.health.detailed().await;
    let status = report.status();

    (
        status_code(status),
        Json(DetailedHealthResponse {
            status,
            timestamp: Utc::now().to_rfc3339(),
            report,
        }),
    )
}
