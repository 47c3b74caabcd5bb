use std::{env, fs, path::Path};
use serde::Deserialize;
use tracing::debug;
use crate::routing::RouteTemplate;

mod server;
pub mod logging;
mod error;
pub mod docker;
pub mod routing;
pub mod upstream;

pub use server::ServerSettings;
pub use logging::LogSettings;
pub use docker::DockerSettings;
pub use routing::{RoutingMode, RoutingSettings};
pub use upstream::UpstreamSettings;
pub use error::SettingsError;

pub type Result<T> = std::result::Result<T, SettingsError>;
pub use server::parse_env_var;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    // 서버 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    // 서비스 이름 추출 및 주소 선택 정책
    #[serde(default)]
    pub routing: RoutingSettings,

    // 백엔드 호출 설정
    #[serde(default)]
    pub upstream: UpstreamSettings,

    #[serde(default)]
    pub docker: DockerSettings,
}

impl Settings {
    pub async fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("PROXY_CONFIG_FILE") {
            Self::from_toml_file(&config_path).await
        } else {
            Self::from_env().await
        }
    }

    pub async fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "TOML 설정 파일 로드");
        let content = fs::read_to_string(&path).map_err(|e| SettingsError::FileError {
            path: path.as_ref().to_string_lossy().to_string(),
            error: e,
        })?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::ParseError { source: e })?;

        settings.validate().await?;
        Ok(settings)
    }

    pub async fn from_env() -> Result<Self> {
        let settings = Self {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
            routing: RoutingSettings::from_env()?,
            upstream: UpstreamSettings::from_env()?,
            docker: DockerSettings::from_env()?,
        };

        // 설정 생성 시점에 바로 검증
        settings.validate().await?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    pub async fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.routing.validate()?;
        self.upstream.validate()?;
        self.docker.validate()?;

        // 와일드카드 모드에서 메트릭 경로가 함수 라우트로 해석되면 안 됨
        if self.routing.mode == RoutingMode::Wildcard {
            let template = RouteTemplate::from_str(&self.routing.route_template)
                .map_err(|e| SettingsError::InvalidConfig(e.to_string()))?;
            if template.matches(&self.server.metrics_path) {
                return Err(SettingsError::InvalidConfig(format!(
                    "메트릭 경로 {}가 라우트 템플릿 {}과 겹칩니다",
                    self.server.metrics_path, self.routing.route_template
                )));
            }
        }

        Ok(())
    }
}
