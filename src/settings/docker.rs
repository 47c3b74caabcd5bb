use serde::Deserialize;
use super::{SettingsError, parse_env_var};
pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Deserialize)]
pub struct DockerSettings {
    /// 서비스 조회 타임아웃 (초)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl DockerSettings {
    pub fn from_env() -> Result<Self> {
        let settings = Self {
            timeout_secs: parse_env_var("PROXY_DOCKER_TIMEOUT", default_timeout)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(SettingsError::EnvVarInvalid {
                var_name: "PROXY_DOCKER_TIMEOUT".to_string(),
                value: self.timeout_secs.to_string(),
                reason: "타임아웃은 0보다 커야 합니다".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
