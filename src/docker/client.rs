use std::time::Duration;
use async_trait::async_trait;
use bollard::models::Service;
use bollard::service::ListServicesOptions;
use bollard::Docker;
use super::DockerError;

#[async_trait]
pub trait DockerClient: Send + Sync {
    async fn list_services(&self, options: Option<ListServicesOptions<String>>)
        -> Result<Vec<Service>, DockerError>;
}

// 실제 Docker 클라이언트 구현
pub struct BollardDockerClient(Docker);

impl BollardDockerClient {
    /// 로컬 기본 설정(DOCKER_HOST 또는 유닉스 소켓)으로 연결합니다.
    pub fn connect(timeout: Duration) -> Result<Self, DockerError> {
        let docker = Docker::connect_with_local_defaults()?
            .with_timeout(timeout);
        Ok(Self(docker))
    }
}

#[async_trait]
impl DockerClient for BollardDockerClient {
    async fn list_services(&self, options: Option<ListServicesOptions<String>>)
        -> Result<Vec<Service>, DockerError> {
        self.0.list_services(options).await
            .map_err(|e| DockerError::ListServicesError {
                source: e,
                context: "swarm 서비스 조회".to_string(),
            })
    }
}
