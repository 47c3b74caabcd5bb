use serde::Deserialize;
use std::env;
use std::time::Duration;
use super::{SettingsError, parse_env_var, server::ServerSettings};

/// 백엔드 호출용 프록시 클라이언트 설정
///
/// 새로 스케줄된 백엔드나 비정상 백엔드에 대해 빠르게 실패하도록
/// 짧은 연결 수명을 기본값으로 사용합니다.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    /// 백엔드 고정 포트
    #[serde(default = "default_backend_port")]
    pub backend_port: u16,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_ms: u64,

    #[serde(default = "default_max_idle")]
    pub max_idle_connections: usize,

    #[serde(default)]
    pub keep_alive: bool,

    /// 응답 헤더 수신까지의 최대 대기 시간 (초)
    #[serde(default = "default_response_timeout")]
    pub response_timeout_secs: u64,
}

fn default_backend_port() -> u16 { 8080 }
fn default_connect_timeout() -> u64 { 3000 }
fn default_idle_timeout() -> u64 { 120 }
fn default_max_idle() -> usize { 1 }
fn default_response_timeout() -> u64 { 60 }

impl UpstreamSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let backend_port = ServerSettings::parse_port(
            "PROXY_BACKEND_PORT",
            &env::var("PROXY_BACKEND_PORT").unwrap_or_else(|_| default_backend_port().to_string())
        )?;

        let settings = Self {
            backend_port,
            connect_timeout_ms: parse_env_var("PROXY_CONNECT_TIMEOUT_MS", default_connect_timeout)?,
            idle_timeout_ms: parse_env_var("PROXY_IDLE_TIMEOUT_MS", default_idle_timeout)?,
            max_idle_connections: parse_env_var("PROXY_MAX_IDLE_CONNS", default_max_idle)?,
            keep_alive: parse_env_var("PROXY_KEEP_ALIVE", || false)?,
            response_timeout_secs: parse_env_var("PROXY_RESPONSE_TIMEOUT", default_response_timeout)?,
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.backend_port == 0 {
            return Err(SettingsError::EnvVarInvalid {
                var_name: "PROXY_BACKEND_PORT".to_string(),
                value: "0".to_string(),
                reason: "포트는 0이 될 수 없습니다".to_string(),
            });
        }

        if self.connect_timeout_ms == 0 || self.response_timeout_secs == 0 {
            return Err(SettingsError::InvalidConfig(
                "연결/응답 타임아웃은 0보다 커야 합니다".to_string()
            ));
        }

        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            backend_port: default_backend_port(),
            connect_timeout_ms: default_connect_timeout(),
            idle_timeout_ms: default_idle_timeout(),
            max_idle_connections: default_max_idle(),
            keep_alive: false,
            response_timeout_secs: default_response_timeout(),
        }
    }
}
