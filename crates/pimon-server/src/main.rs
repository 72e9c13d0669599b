//! # pimon-server
//!
//! PIMON 모니터링 서버 바이너리 진입점.
//! 설정 로드, DI (SQLite 저장소 → 서비스 → 웹 서버), 라이프사이클 관리,
//! 외부 스케줄러가 호출하는 보존 정리(`prune`).

mod lifecycle;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use pimon_core::config::AppConfig;
use pimon_core::config_manager;
use pimon_core::services::MetricService;
use pimon_storage::sqlite::SqliteStorage;
use pimon_web::{AppState, WebServer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// PIMON 모니터링 서버
///
/// 원격 호스트의 시스템 메트릭 수집/조회 REST API
#[derive(Parser, Debug)]
#[command(name = "pimon-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (TOML/JSON/YAML)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// SQLite 데이터베이스 경로 (설정 파일보다 우선)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// 리스닝 포트 (설정 파일보다 우선)
    #[arg(long, short = 'p', global = true)]
    port: Option<u16>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// API 서버 실행 (기본)
    Serve,
    /// 기준 시각 이전 메트릭 삭제
    Prune {
        /// 이 Unix 시각(초)보다 오래된 메트릭 삭제
        #[arg(long, conflicts_with = "older_than_days", required_unless_present = "older_than_days")]
        before: Option<i64>,
        /// 현재로부터 N일보다 오래된 메트릭 삭제
        #[arg(long)]
        older_than_days: Option<u32>,
    },
}

/// 설정 파일 경로 결정
///
/// `--config`가 없으면 플랫폼별 기본 경로에 파일이 있을 때만 사용:
/// - Linux: `~/.config/pimon/config.toml`
/// - macOS: `~/Library/Application Support/io.pimon.pimon/config.toml`
fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    ProjectDirs::from("io", "pimon", "pimon")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .filter(|path| path.is_file())
}

/// 설정 로드 후 CLI 인자 적용
fn load_config(args: &Args) -> Result<AppConfig> {
    let path = resolve_config_path(args.config.as_deref());
    let mut config = config_manager::load(path.as_deref()).context("설정 로드 실패")?;

    if let Some(db_path) = &args.db_path {
        config.storage.db_path = db_path.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    config_manager::validate(&config).context("설정 검증 실패")?;
    Ok(config)
}

fn log_filter(level: &str) -> String {
    ["pimon_server", "pimon_core", "pimon_storage", "pimon_web", "tower_http"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn open_storage(config: &AppConfig) -> Result<Arc<SqliteStorage>> {
    let storage = SqliteStorage::open(&config.storage.db_path, config.storage.host_delete_policy)
        .with_context(|| {
            format!(
                "데이터베이스 열기 실패: {}",
                config.storage.db_path.display()
            )
        })?;
    Ok(Arc::new(storage))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(&args.log_level))),
        )
        .init();

    let config = load_config(&args)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Prune {
            before,
            older_than_days,
        } => prune(config, before, older_than_days).await,
    }
}

/// API 서버 실행. SIGINT/SIGTERM 수신 시 graceful shutdown
async fn serve(config: AppConfig) -> Result<()> {
    info!(
        "PIMON 서버 시작 (db: {}, 호스트 삭제 정책: {:?})",
        config.storage.db_path.display(),
        config.storage.host_delete_policy
    );

    let storage = open_storage(&config)?;
    let state = AppState::from_repository(storage);
    let server = WebServer::new(state, config.server.clone(), config.cors.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut server_handle = tokio::spawn(async move { server.run(shutdown_rx).await });

    tokio::select! {
        // 바인드 실패 등으로 서버가 먼저 끝난 경우
        result = &mut server_handle => {
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    error!("API 서버 오류: {e}");
                    Err(anyhow!("API 서버 오류: {e}"))
                }
                Err(e) => Err(anyhow!("API 서버 태스크 실패: {e}")),
            };
        }
        _ = lifecycle::notify_on(lifecycle::shutdown_signal(), &shutdown_tx) => {}
    }

    match server_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("API 서버 종료 중 오류: {e}"),
        Err(e) => error!("API 서버 태스크 실패: {e}"),
    }

    info!("PIMON 서버 종료 완료");
    Ok(())
}

/// 보존 기간이 지난 메트릭 삭제
async fn prune(config: AppConfig, before: Option<i64>, older_than_days: Option<u32>) -> Result<()> {
    let storage = open_storage(&config)?;
    let metrics = MetricService::new(storage);

    let deleted = match (before, older_than_days) {
        (Some(cutoff), _) => metrics.purge_older_than(cutoff).await?,
        (None, Some(days)) => {
            metrics
                .purge_older_than_days(days, chrono::Utc::now().timestamp())
                .await?
        }
        (None, None) => return Err(anyhow!("--before 또는 --older-than-days 필요")),
    };

    info!("메트릭 {deleted}건 삭제");
    println!("deleted {deleted} metric records");
    Ok(())
}
