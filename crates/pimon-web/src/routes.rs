//! API 라우트 정의.

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::AppState;

/// 헬스 점검 라우트
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// `/api/v1` 하위 라우트
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 호스트
        .route(
            "/hosts",
            get(handlers::hosts::list_hosts).post(handlers::hosts::create_host),
        )
        .route(
            "/hosts/{id}",
            get(handlers::hosts::get_host)
                .put(handlers::hosts::update_host)
                .delete(handlers::hosts::delete_host),
        )
        // 메트릭
        .route(
            "/metrics",
            get(handlers::metrics::list_metrics).post(handlers::metrics::create_metric),
        )
        .route("/metrics/latest", get(handlers::metrics::latest_metric))
        .route(
            "/metrics/latest/hosts",
            get(handlers::metrics::latest_metrics_by_host),
        )
}
