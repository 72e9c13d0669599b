//! # pimon-web
//!
//! 모니터링 수집/조회 REST API 서버.
//! Axum 기반, 원격 에이전트가 호스트 등록과 메트릭을 push하고
//! 대시보드가 필터/페이지 조회한다.
//!
//! ## 엔드포인트
//! - `GET /health`, `GET /health/detailed`
//! - `/api/v1/hosts`, `/api/v1/hosts/{id}`
//! - `/api/v1/metrics`, `/api/v1/metrics/latest`, `/api/v1/metrics/latest/hosts`

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use pimon_core::config::{CorsConfig, ServerConfig};
use pimon_core::ports::repository::{HealthRepository, HostRepository, MetricRepository};
use pimon_core::services::{HealthService, HostService, MetricService};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 호스트 서비스
    pub hosts: Arc<HostService>,
    /// 메트릭 서비스
    pub metrics: Arc<MetricService>,
    /// 헬스 서비스
    pub health: Arc<HealthService>,
}

impl AppState {
    /// 서비스 조합으로 상태 생성
    pub fn new(hosts: HostService, metrics: MetricService, health: HealthService) -> Self {
        Self {
            hosts: Arc::new(hosts),
            metrics: Arc::new(metrics),
            health: Arc::new(health),
        }
    }

    /// 세 포트를 모두 구현한 저장소 하나로 상태 생성
    pub fn from_repository<R>(repo: Arc<R>) -> Self
    where
        R: HostRepository + MetricRepository + HealthRepository + 'static,
    {
        Self::new(
            HostService::new(repo.clone()),
            MetricService::new(repo.clone()),
            HealthService::new(repo),
        )
    }
}

/// CORS 허용 헤더
const ALLOWED_HEADERS: [HeaderName; 9] = [
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::ACCEPT_ENCODING,
    HeaderName::from_static("x-csrf-token"),
    header::AUTHORIZATION,
    header::ACCEPT,
    header::ORIGIN,
    header::CACHE_CONTROL,
    HeaderName::from_static("x-requested-with"),
];

/// CORS 레이어 생성
///
/// `"*"`가 있으면 모든 출처 허용 (credentials 비활성), 아니면 목록의 출처만
/// credentials와 함께 허용한다.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(ALLOWED_HEADERS);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("잘못된 CORS 출처 무시: {origin} ({e})");
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// 전체 라우터 구성
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .nest("/api/v1", routes::api_routes())
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors)),
        )
        .with_state(state)
}

/// REST API 서버
pub struct WebServer {
    config: ServerConfig,
    cors: CorsConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(state: AppState, config: ServerConfig, cors: CorsConfig) -> Self {
        Self {
            config,
            cors,
            state,
        }
    }

    /// 설정된 주소에 바인드 후 실행
    ///
    /// # Arguments
    /// * `shutdown_rx` - 종료 신호 수신 채널
    pub async fn run(self, shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("잘못된 주소 {}:{}: {e}", self.config.host, self.config.port),
                )
            })?;

        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_rx).await
    }

    /// 이미 바인드된 리스너로 실행. 종료 신호 수신 시 진행 중인 요청을 마치고 반환
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(), std::io::Error> {
        let app = build_router(self.state, &self.cors);

        info!("API 서버 시작: http://{}", listener.local_addr()?);

        // Graceful shutdown과 함께 서버 실행
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("API 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("API 서버 종료");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_layer_accepts_wildcard_and_lists() {
        let _ = cors_layer(&CorsConfig {
            allowed_origins: vec!["*".to_string()],
        });
        let _ = cors_layer(&CorsConfig {
            allowed_origins: vec!["http://localhost".to_string(), "bad\norigin".to_string()],
        });
    }
}
