//! 호스트 API 핸들러.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pimon_core::models::host::{Host, HostQueryParams, NewHost};
use serde::{Deserialize, Serialize};

use super::{CreatedResponse, MessageResponse, Meta};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::AppState;

/// 호스트 등록/수정 요청 본문 (`{"host": {...}}`)
#[derive(Debug, Deserialize, Serialize)]
pub struct HostRequest {
    pub host: NewHost,
}

/// 호스트 목록 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct HostListResponse {
    pub hosts: Vec<Host>,
    pub meta: Meta,
}

/// 호스트 단건 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct HostResponse {
    pub host: Host,
}

/// 호스트 등록 (hostname 또는 ip_address 기준 upsert)
///
/// POST /api/v1/hosts
pub async fn create_host(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<HostRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = state
        .hosts
        .register(&req.host)
        .await
        .map_err(|e| ApiError::from_core("Failed to create host", e))?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Host created successfully".to_string(),
            id,
        }),
    ))
}

/// 호스트 목록 조회
///
/// GET /api/v1/hosts?id=&hostname=&ip_address=
pub async fn list_hosts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<HostQueryParams>,
) -> Result<Json<HostListResponse>, ApiError> {
    let hosts = state
        .hosts
        .list(&params)
        .await
        .map_err(|e| ApiError::from_core("Failed to retrieve hosts", e))?;

    Ok(Json(HostListResponse {
        meta: Meta {
            count: hosts.len(),
            limit: None,
        },
        hosts,
    }))
}

/// 호스트 조회
///
/// GET /api/v1/hosts/{id}
pub async fn get_host(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<HostResponse>, ApiError> {
    let host = state
        .hosts
        .get(id)
        .await
        .map_err(|e| ApiError::from_core("Failed to retrieve host", e))?
        .ok_or_else(|| ApiError::not_found("Host not found", format!("no host with id {id}")))?;

    Ok(Json(HostResponse { host }))
}

/// 호스트 role 갱신
///
/// PUT /api/v1/hosts/{id}
pub async fn update_host(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<HostRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let affected = state
        .hosts
        .update(id, &req.host)
        .await
        .map_err(|e| ApiError::from_core("Failed to update host", e))?;

    if affected == 0 {
        return Err(ApiError::not_found(
            "Host not found",
            format!("no host with id {id}"),
        ));
    }

    Ok(Json(MessageResponse::new("Host updated successfully")))
}

/// 호스트 삭제
///
/// DELETE /api/v1/hosts/{id}
pub async fn delete_host(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .hosts
        .delete(id)
        .await
        .map_err(|e| ApiError::from_core("Failed to delete host", e))?;

    Ok(Json(MessageResponse::new("Host deleted successfully")))
}
