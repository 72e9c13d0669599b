//! 호스트 서비스.

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::models::host::{Host, HostQueryParams, NewHost};
use crate::ports::repository::HostRepository;

/// 호스트 등록/조회 서비스
pub struct HostService {
    repo: Arc<dyn HostRepository>,
}

impl HostService {
    /// 새 호스트 서비스 생성
    pub fn new(repo: Arc<dyn HostRepository>) -> Self {
        Self { repo }
    }

    /// 호스트 등록 (hostname 또는 ip_address 기준 upsert)
    ///
    /// 기존 행이 있으면 role/last_seen만 갱신하고 기존 ID를 반환한다.
    pub async fn register(&self, host: &NewHost) -> Result<i64, CoreError> {
        validate_host(host)?;
        let id = self.repo.upsert(host).await?;
        info!(
            "호스트 등록: id={}, hostname={}, ip={}",
            id, host.hostname, host.ip_address
        );
        Ok(id)
    }

    /// 신규 삽입 전용. 중복은 저장소 에러로 실패
    pub async fn create(&self, host: &NewHost) -> Result<i64, CoreError> {
        validate_host(host)?;
        self.repo.create(host).await
    }

    /// 필터 조회
    pub async fn list(&self, params: &HostQueryParams) -> Result<Vec<Host>, CoreError> {
        self.repo.find_by_filters(params).await
    }

    /// 단건 조회
    pub async fn get(&self, id: i64) -> Result<Option<Host>, CoreError> {
        validate_id(id)?;
        self.repo.find_by_id(id).await
    }

    /// role/last_seen 갱신. 영향받은 행 수 반환
    pub async fn update(&self, id: i64, host: &NewHost) -> Result<u64, CoreError> {
        validate_id(id)?;
        let affected = self.repo.update(id, host).await?;
        debug!("호스트 갱신: id={}, affected={}", id, affected);
        Ok(affected)
    }

    /// 삭제. 대상이 없으면 `CoreError::NotFound`
    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        validate_id(id)?;
        let affected = self.repo.delete(id).await?;
        if affected == 0 {
            return Err(CoreError::not_found("Host", id));
        }
        info!("호스트 삭제: id={}", id);
        Ok(())
    }
}

fn validate_id(id: i64) -> Result<(), CoreError> {
    if id <= 0 {
        return Err(CoreError::validation("id", "invalid host ID"));
    }
    Ok(())
}

fn validate_host(host: &NewHost) -> Result<(), CoreError> {
    if host.hostname.trim().is_empty() {
        return Err(CoreError::validation("hostname", "hostname is required"));
    }
    if host.ip_address.trim().is_empty() {
        return Err(CoreError::validation("ip_address", "ip_address is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// hostname/ip_address 일치 시 갱신하는 인메모리 저장소
    #[derive(Default)]
    struct MockHostRepository {
        hosts: Mutex<Vec<Host>>,
    }

    #[async_trait]
    impl HostRepository for MockHostRepository {
        async fn find_by_filters(&self, params: &HostQueryParams) -> Result<Vec<Host>, CoreError> {
            let hosts = self.hosts.lock().unwrap();
            Ok(hosts
                .iter()
                .filter(|h| params.id.map_or(true, |id| h.id == id))
                .filter(|h| params.hostname_filter().map_or(true, |n| h.hostname == n))
                .filter(|h| params.ip_address_filter().map_or(true, |ip| h.ip_address == ip))
                .cloned()
                .collect())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Host>, CoreError> {
            let hosts = self.hosts.lock().unwrap();
            Ok(hosts.iter().find(|h| h.id == id).cloned())
        }

        async fn create(&self, host: &NewHost) -> Result<i64, CoreError> {
            let mut hosts = self.hosts.lock().unwrap();
            if hosts.iter().any(|h| h.hostname == host.hostname) {
                return Err(CoreError::Storage(
                    "UNIQUE constraint failed: hosts.hostname".to_string(),
                ));
            }
            let id = hosts.len() as i64 + 1;
            hosts.push(Host {
                id,
                hostname: host.hostname.clone(),
                ip_address: host.ip_address.clone(),
                role: host.role.clone(),
                created_at: 0,
                last_seen: 0,
            });
            Ok(id)
        }

        async fn upsert(&self, host: &NewHost) -> Result<i64, CoreError> {
            {
                let mut hosts = self.hosts.lock().unwrap();
                if let Some(existing) = hosts
                    .iter_mut()
                    .find(|h| h.hostname == host.hostname || h.ip_address == host.ip_address)
                {
                    existing.role = host.role.clone();
                    return Ok(existing.id);
                }
            }
            self.create(host).await
        }

        async fn update(&self, id: i64, host: &NewHost) -> Result<u64, CoreError> {
            let mut hosts = self.hosts.lock().unwrap();
            match hosts.iter_mut().find(|h| h.id == id) {
                Some(existing) => {
                    existing.role = host.role.clone();
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        async fn delete(&self, id: i64) -> Result<u64, CoreError> {
            let mut hosts = self.hosts.lock().unwrap();
            let before = hosts.len();
            hosts.retain(|h| h.id != id);
            Ok((before - hosts.len()) as u64)
        }
    }

    /// 모든 호출이 저장소 에러로 실패하는 저장소
    struct FailingHostRepository;

    #[async_trait]
    impl HostRepository for FailingHostRepository {
        async fn find_by_filters(&self, _: &HostQueryParams) -> Result<Vec<Host>, CoreError> {
            Err(CoreError::Storage("database is locked".to_string()))
        }
        async fn find_by_id(&self, _: i64) -> Result<Option<Host>, CoreError> {
            Err(CoreError::Storage("database is locked".to_string()))
        }
        async fn create(&self, _: &NewHost) -> Result<i64, CoreError> {
            Err(CoreError::Storage("database is locked".to_string()))
        }
        async fn upsert(&self, _: &NewHost) -> Result<i64, CoreError> {
            Err(CoreError::Storage("database is locked".to_string()))
        }
        async fn update(&self, _: i64, _: &NewHost) -> Result<u64, CoreError> {
            Err(CoreError::Storage("database is locked".to_string()))
        }
        async fn delete(&self, _: i64) -> Result<u64, CoreError> {
            Err(CoreError::Storage("database is locked".to_string()))
        }
    }

    fn pi(role: &str) -> NewHost {
        NewHost {
            hostname: "pi-01".to_string(),
            ip_address: "10.0.0.5".to_string(),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn register_twice_keeps_one_row() {
        let service = HostService::new(Arc::new(MockHostRepository::default()));

        let first = service.register(&pi("sensor")).await.unwrap();
        let second = service.register(&pi("gateway")).await.unwrap();
        assert_eq!(first, second);

        let hosts = service.list(&HostQueryParams::default()).await.unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].role, "gateway");
    }

    #[tokio::test]
    async fn register_requires_hostname_and_ip() {
        let service = HostService::new(Arc::new(MockHostRepository::default()));

        let mut host = pi("sensor");
        host.hostname.clear();
        match service.register(&host).await {
            Err(CoreError::Validation { field, .. }) => assert_eq!(field, "hostname"),
            other => panic!("예상치 못한 결과: {other:?}"),
        }

        let mut host = pi("sensor");
        host.ip_address = "  ".to_string();
        match service.register(&host).await {
            Err(CoreError::Validation { field, .. }) => assert_eq!(field, "ip_address"),
            other => panic!("예상치 못한 결과: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_duplicate_surfaces_storage_error() {
        let service = HostService::new(Arc::new(MockHostRepository::default()));
        service.create(&pi("sensor")).await.unwrap();

        match service.create(&pi("sensor")).await {
            Err(CoreError::Storage(msg)) => assert!(msg.contains("UNIQUE")),
            other => panic!("예상치 못한 결과: {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_missing_host_reports_zero_rows() {
        let service = HostService::new(Arc::new(MockHostRepository::default()));
        let affected = service.update(99, &pi("sensor")).await.unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn delete_distinguishes_outcomes() {
        let service = HostService::new(Arc::new(MockHostRepository::default()));
        let id = service.register(&pi("sensor")).await.unwrap();

        // 존재하는 호스트 → 성공
        service.delete(id).await.unwrap();

        // 이미 삭제됨 → NotFound
        assert!(matches!(
            service.delete(id).await,
            Err(CoreError::NotFound { .. })
        ));

        // 저장소 실패 → Storage
        let failing = HostService::new(Arc::new(FailingHostRepository));
        assert!(matches!(
            failing.delete(id).await,
            Err(CoreError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn non_positive_id_is_rejected() {
        let service = HostService::new(Arc::new(FailingHostRepository));
        assert!(matches!(
            service.delete(0).await,
            Err(CoreError::Validation { .. })
        ));
        assert!(matches!(
            service.get(-3).await,
            Err(CoreError::Validation { .. })
        ));
    }
}
