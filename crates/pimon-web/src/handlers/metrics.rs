//! 메트릭 API 핸들러.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pimon_core::models::metric::{
    MetricLatestQueryParams, MetricQueryParams, NewSystemMetric, SystemMetric,
};
use serde::{Deserialize, Serialize};

use super::{CreatedResponse, Meta};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::AppState;

/// 메트릭 수집 요청 본문 (`{"record": {...}}`)
#[derive(Debug, Deserialize, Serialize)]
pub struct MetricRequest {
    pub record: NewSystemMetric,
}

/// 메트릭 목록 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricListResponse {
    pub records: Vec<SystemMetric>,
    pub meta: Meta,
}

/// 최신 메트릭 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct LatestMetricResponse {
    pub metric: SystemMetric,
}

/// 메트릭 수집
///
/// POST /api/v1/metrics
pub async fn create_metric(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<MetricRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = state
        .metrics
        .create(&req.record)
        .await
        .map_err(|e| ApiError::from_core("Failed to create metric", e))?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Metric created successfully".to_string(),
            id,
        }),
    ))
}

/// 메트릭 목록 조회
///
/// GET /api/v1/metrics?host_id=&limit=&order=&start_time=&end_time=
///
/// 기본값: limit 100 (최대 1000), order DESC, 최근 30일
pub async fn list_metrics(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<MetricQueryParams>,
) -> Result<Json<MetricListResponse>, ApiError> {
    let (records, filter) = state
        .metrics
        .list(&params)
        .await
        .map_err(|e| ApiError::from_core("Failed to retrieve metrics", e))?;

    Ok(Json(MetricListResponse {
        meta: Meta {
            count: records.len(),
            limit: Some(filter.limit),
        },
        records,
    }))
}

/// 최신 메트릭 1건. `host_id`가 없으면 전체 호스트 중 최신
///
/// GET /api/v1/metrics/latest?host_id=
pub async fn latest_metric(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<MetricLatestQueryParams>,
) -> Result<Json<LatestMetricResponse>, ApiError> {
    let metric = state
        .metrics
        .latest(params.host_id)
        .await
        .map_err(|e| ApiError::from_core("Failed to retrieve latest metric", e))?
        .ok_or_else(|| {
            let details = match params.host_id {
                Some(id) => format!("no metrics recorded for host {id}"),
                None => "no metrics recorded".to_string(),
            };
            ApiError::not_found("Metric not found", details)
        })?;

    Ok(Json(LatestMetricResponse { metric }))
}

/// 호스트별 최신 메트릭 목록
///
/// GET /api/v1/metrics/latest/hosts
pub async fn latest_metrics_by_host(
    State(state): State<AppState>,
) -> Result<Json<MetricListResponse>, ApiError> {
    let records = state
        .metrics
        .latest_by_host()
        .await
        .map_err(|e| ApiError::from_core("Failed to retrieve latest metrics", e))?;

    Ok(Json(MetricListResponse {
        meta: Meta {
            count: records.len(),
            limit: None,
        },
        records,
    }))
}
