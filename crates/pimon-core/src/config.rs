//! 애플리케이션 설정 구조체.
//!
//! 서버 바인드 주소, 저장소 경로, 호스트 삭제 정책, CORS 허용 출처를 정의한다.
//! `config` crate를 통해 파일/환경변수에서 로드 (`config_manager` 참고).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// CORS 설정
    #[serde(default)]
    pub cors: CorsConfig,
}

// ============================================================
// 서버 설정
// ============================================================

/// HTTP 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 바인드 주소
    #[serde(default = "default_host")]
    pub host: String,
    /// 포트
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8191
}

// ============================================================
// 저장소 설정
// ============================================================

/// 메트릭이 남아 있는 호스트 삭제 시 동작
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostDeletePolicy {
    /// 외래 키 제약으로 거부 (드라이버 에러 그대로 반환)
    #[default]
    Restrict,
    /// 같은 트랜잭션에서 메트릭 먼저 삭제
    Cascade,
}

/// 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite 파일 경로
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    #[serde(default)]
    pub host_delete_policy: HostDeletePolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            host_delete_policy: HostDeletePolicy::default(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./pimon.db")
}

// ============================================================
// CORS 설정
// ============================================================

/// CORS 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 허용 출처 목록. `"*"` 포함 시 모든 출처 허용 (credentials 비활성)
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    /// 와일드카드 허용 여부
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost".to_string()]
}

/// 쉼표 구분 출처 목록 파싱. 공백 제거, 빈 항목 무시
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_filtered() {
        let origins = parse_origins(" http://a.local, ,http://b.local ,");
        assert_eq!(origins, vec!["http://a.local", "http://b.local"]);
    }

    #[test]
    fn wildcard_detection() {
        let cors = CorsConfig {
            allowed_origins: parse_origins("http://a.local,*"),
        };
        assert!(cors.allows_any_origin());
        assert!(!CorsConfig::default().allows_any_origin());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"storage":{"host_delete_policy":"cascade"}}"#).unwrap();
        assert_eq!(config.server.port, 8191);
        assert_eq!(config.storage.db_path, PathBuf::from("./pimon.db"));
        assert_eq!(config.storage.host_delete_policy, HostDeletePolicy::Cascade);
    }
}
