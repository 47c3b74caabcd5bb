use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::docker::DockerManager;
use crate::metrics::PrometheusMetrics;
use crate::proxy::RequestForwarder;
use crate::routing::{
    AddressingPolicy, BackendAddressSelector, DnsResolver, ServiceNameExtractor, ServiceResolver,
    SystemDnsResolver,
};
use crate::settings::Settings;
use super::exporter::MetricsExporter;
use super::handler::RequestHandler;
use super::listener::ServerListener;
use super::Result;

/// 설정으로부터 게이트웨이 구성 요소를 조립하고 실행합니다.
pub struct ServerManager {
    pub config: Settings,
    pub handler: Arc<RequestHandler>,
    pub metrics: PrometheusMetrics,
}

impl ServerManager {
    /// 외부 협력자(서비스 조회, DNS)를 주입해서 생성합니다.
    pub fn new(
        config: Settings,
        resolver: Arc<dyn ServiceResolver>,
        dns: Arc<dyn DnsResolver>,
    ) -> Result<Self> {
        let metrics = PrometheusMetrics::new()?;
        let extractor = ServiceNameExtractor::from_settings(&config.routing)?;

        // 주소 선택 정책은 시작 시 한 번만 결정
        let selector = BackendAddressSelector::new(
            AddressingPolicy::from_flag(config.routing.dns_round_robin),
            config.upstream.backend_port,
            dns,
            Duration::from_millis(config.routing.dns_timeout_ms),
        );

        let forwarder = RequestForwarder::new(&config.upstream);

        info!(
            mode = ?config.routing.mode,
            policy = ?selector.policy(),
            backend_port = config.upstream.backend_port,
            "게이트웨이 구성 완료"
        );

        let handler = Arc::new(RequestHandler::new(
            extractor,
            resolver,
            selector,
            forwarder,
            Arc::new(metrics.clone()),
        ));

        Ok(Self {
            config,
            handler,
            metrics,
        })
    }

    /// 로컬 Docker 데몬과 시스템 DNS를 사용해 생성합니다.
    #[instrument(skip(config), level = "debug", err)]
    pub async fn create(config: Settings) -> Result<Self> {
        let docker_manager = DockerManager::with_defaults(&config.docker).await?;
        Self::new(config, Arc::new(docker_manager), Arc::new(SystemDnsResolver))
    }

    pub fn exporter(&self) -> Arc<MetricsExporter> {
        Arc::new(MetricsExporter::new(
            self.config.server.metrics_path.clone(),
            self.metrics.clone(),
        ))
    }

    #[instrument(skip(self), level = "info", err)]
    pub async fn start(&self) -> Result<()> {
        let listener = ServerListener::bind(self.config.server.http_port).await?;
        listener.run(self.handler.clone(), Some(self.exporter())).await
    }
}
