mod client;
mod error_types;

pub use client::{BollardDockerClient, DockerClient};
pub use error_types::DockerError;

use std::collections::HashMap;
use std::time::Duration;
use async_trait::async_trait;
use bollard::models::Service;
use bollard::service::ListServicesOptions;
use tracing::{debug, info};
use crate::routing::{ResolveError, ServiceResolver};
use crate::settings::DockerSettings;

/// swarm 서비스 목록을 통해 함수 존재 여부를 확인합니다.
pub struct DockerManager {
    client: Box<dyn DockerClient>,
}

impl DockerManager {
    pub fn new(client: Box<dyn DockerClient>) -> Self {
        Self { client }
    }

    /// 로컬 Docker 데몬에 연결된 매니저를 생성합니다.
    pub async fn with_defaults(settings: &DockerSettings) -> Result<Self, DockerError> {
        let client = BollardDockerClient::connect(Duration::from_secs(settings.timeout_secs))?;
        info!(timeout_secs = settings.timeout_secs, "Docker 클라이언트 초기화 완료");
        Ok(Self::new(Box::new(client)))
    }

    fn name_filter(name: &str) -> ListServicesOptions<String> {
        let mut filters = HashMap::new();
        filters.insert("name".to_string(), vec![name.to_string()]);
        ListServicesOptions {
            filters,
            ..Default::default()
        }
    }

    /// 이름이 정확히 일치하는 서비스가 있는지 조회합니다.
    ///
    /// Docker의 `name` 필터는 접두사로도 일치하므로 결과를 한 번 더 거릅니다.
    pub async fn service_exists(&self, name: &str) -> Result<bool, DockerError> {
        debug!(function = %name, "Resolving");
        let services = self.client.list_services(Some(Self::name_filter(name))).await?;

        let matched = services.iter()
            .filter(|service| service_name(service) == Some(name))
            .count();

        debug!(
            function = %name,
            listed = services.len(),
            matched = matched,
            "서비스 조회 완료"
        );

        Ok(matched > 0)
    }
}

fn service_name(service: &Service) -> Option<&str> {
    service.spec.as_ref().and_then(|spec| spec.name.as_deref())
}

#[async_trait]
impl ServiceResolver for DockerManager {
    async fn exists(&self, name: &str) -> Result<bool, ResolveError> {
        Ok(self.service_exists(name).await?)
    }
}
