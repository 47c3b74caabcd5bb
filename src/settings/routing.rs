use serde::Deserialize;
use std::env;
use super::{SettingsError, parse_env_var};

/// 서비스 이름 추출 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// 경로 변수 (`/function/{name}`)
    Wildcard,
    /// 전용 요청 헤더 (`X-Function`)
    Header,
}

impl Default for RoutingMode {
    fn default() -> Self {
        RoutingMode::Wildcard
    }
}

impl std::str::FromStr for RoutingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wildcard" | "path" => Ok(RoutingMode::Wildcard),
            "header" => Ok(RoutingMode::Header),
            _ => Err(format!("Invalid routing mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingSettings {
    #[serde(default)]
    pub mode: RoutingMode,

    /// 와일드카드 모드에서 사용하는 라우트 템플릿
    #[serde(default = "default_route_template")]
    pub route_template: String,

    /// 헤더 모드에서 서비스 이름을 담는 헤더
    #[serde(default = "default_function_header")]
    pub function_header: String,

    /// DNS 라운드 로빈 사용 여부 (기본값: VIP)
    #[serde(default)]
    pub dns_round_robin: bool,

    /// `tasks.<name>` 조회 타임아웃 (밀리초)
    #[serde(default = "default_dns_timeout")]
    pub dns_timeout_ms: u64,
}

fn default_route_template() -> String { "/function/{name}".to_string() }
fn default_function_header() -> String { "X-Function".to_string() }
fn default_dns_timeout() -> u64 { 1000 }

impl RoutingSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let settings = Self {
            mode: parse_env_var("PROXY_ROUTING_MODE", RoutingMode::default)?,
            route_template: parse_env_var("PROXY_ROUTE_TEMPLATE", default_route_template)?,
            function_header: parse_env_var("PROXY_FUNCTION_HEADER", default_function_header)?,
            dns_round_robin: parse_env_var("PROXY_DNS_RR", legacy_dnsrr)?,
            dns_timeout_ms: parse_env_var("PROXY_DNS_TIMEOUT_MS", default_dns_timeout)?,
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.route_template.starts_with('/') || !self.route_template.contains("{name}") {
            return Err(SettingsError::EnvVarInvalid {
                var_name: "PROXY_ROUTE_TEMPLATE".to_string(),
                value: self.route_template.clone(),
                reason: "템플릿은 '/'로 시작하고 {name} 변수를 포함해야 합니다".to_string(),
            });
        }

        if hyper::header::HeaderName::from_bytes(self.function_header.as_bytes()).is_err() {
            return Err(SettingsError::EnvVarInvalid {
                var_name: "PROXY_FUNCTION_HEADER".to_string(),
                value: self.function_header.clone(),
                reason: "유효한 HTTP 헤더 이름이 아닙니다".to_string(),
            });
        }

        Ok(())
    }
}

// 기존 배포에서 쓰던 `dnsrr=true` 도 인정
fn legacy_dnsrr() -> bool {
    env::var("dnsrr").map(|v| v == "true").unwrap_or(false)
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            mode: RoutingMode::default(),
            route_template: default_route_template(),
            function_header: default_function_header(),
            dns_round_robin: false,
            dns_timeout_ms: default_dns_timeout(),
        }
    }
}
