//! 설정 로드.
//!
//! 우선순위 (뒤가 앞을 덮어씀):
//! 1. 기본값 (`AppConfig::default`)
//! 2. 설정 파일 (TOML/JSON/YAML, 확장자로 판별)
//! 3. `PIMON__SECTION__KEY` 환경변수 (예: `PIMON__SERVER__PORT`)
//! 4. 단축 환경변수 `PORT`, `DB_PATH`, `ALLOWED_ORIGINS`

use config::{Config, Environment, File};
use std::path::Path;
use tracing::{debug, info};

use crate::config::{parse_origins, AppConfig};
use crate::error::CoreError;

/// 환경변수 접두사
pub const ENV_PREFIX: &str = "PIMON";

/// 설정 로드 (프로세스 환경변수 사용)
pub fn load(path: Option<&Path>) -> Result<AppConfig, CoreError> {
    load_with_env(path, |key| std::env::var(key).ok())
}

/// 설정 로드. 단축 환경변수 조회 함수를 주입받는다
pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<AppConfig, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder();

    if let Some(path) = path {
        info!("설정 파일 로드: {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("cors.allowed_origins")
            .try_parsing(true),
    );

    if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
        debug!("PORT 환경변수 적용: {port}");
        builder = builder
            .set_override("server.port", port.trim().to_string())
            .map_err(config_error)?;
    }

    if let Some(db_path) = lookup("DB_PATH").filter(|v| !v.trim().is_empty()) {
        debug!("DB_PATH 환경변수 적용: {db_path}");
        builder = builder
            .set_override("storage.db_path", db_path)
            .map_err(config_error)?;
    }

    if let Some(raw) = lookup("ALLOWED_ORIGINS") {
        let origins = parse_origins(&raw);
        if !origins.is_empty() {
            builder = builder
                .set_override("cors.allowed_origins", origins)
                .map_err(config_error)?;
        }
    }

    let config: AppConfig = builder
        .build()
        .map_err(config_error)?
        .try_deserialize()
        .map_err(config_error)?;

    validate(&config)?;
    Ok(config)
}

/// 로드 후 검증
pub fn validate(config: &AppConfig) -> Result<(), CoreError> {
    if config.storage.db_path.as_os_str().is_empty() {
        return Err(CoreError::Config("storage.db_path가 비어 있음".to_string()));
    }
    if config.server.host.trim().is_empty() {
        return Err(CoreError::Config("server.host가 비어 있음".to_string()));
    }
    Ok(())
}

fn config_error(e: config::ConfigError) -> CoreError {
    CoreError::Config(e.to_string())
}
