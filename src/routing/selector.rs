use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv6Addr};
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, warn};

/// 백엔드 주소 선택 정책. 프로세스 수명 동안 고정됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingPolicy {
    /// 서비스 이름을 그대로 사용 (가상 IP가 레플리카에 분산)
    Vip,
    /// `tasks.<name>` 조회 결과 중 하나를 무작위로 선택
    DnsRoundRobin,
}

impl AddressingPolicy {
    pub fn from_flag(dns_round_robin: bool) -> Self {
        if dns_round_robin {
            AddressingPolicy::DnsRoundRobin
        } else {
            AddressingPolicy::Vip
        }
    }
}

/// 요청마다 새로 결정되는 백엔드 주소입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendAddress {
    pub host: String,
    pub port: u16,
}

impl BackendAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for BackendAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn lookup_ip(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

/// 시스템 리졸버(getaddrinfo)를 사용하는 기본 구현
#[derive(Debug, Clone, Default)]
pub struct SystemDnsResolver;

#[async_trait]
impl DnsResolver for SystemDnsResolver {
    async fn lookup_ip(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, 0)).await?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

pub struct BackendAddressSelector {
    policy: AddressingPolicy,
    backend_port: u16,
    dns: Arc<dyn DnsResolver>,
    lookup_timeout: Duration,
}

impl BackendAddressSelector {
    pub fn new(
        policy: AddressingPolicy,
        backend_port: u16,
        dns: Arc<dyn DnsResolver>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            policy,
            backend_port,
            dns,
            lookup_timeout,
        }
    }

    pub fn policy(&self) -> AddressingPolicy {
        self.policy
    }

    pub async fn select(&self, name: &str) -> BackendAddress {
        match self.policy {
            AddressingPolicy::Vip => BackendAddress::new(name, self.backend_port),
            AddressingPolicy::DnsRoundRobin => self.select_task(name).await,
        }
    }

    async fn select_task(&self, name: &str) -> BackendAddress {
        let tasks_host = format!("tasks.{}", name);

        let entries = match tokio::time::timeout(self.lookup_timeout, self.dns.lookup_ip(&tasks_host)).await {
            Ok(Ok(entries)) => entries,
            Ok(Err(e)) => {
                debug!(host = %tasks_host, error = %e, "DNS 조회 실패, VIP로 대체");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    host = %tasks_host,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "DNS 조회 시간 초과, VIP로 대체"
                );
                Vec::new()
            }
        };

        if entries.is_empty() {
            return BackendAddress::new(name, self.backend_port);
        }

        // 스레드 로컬 생성기는 OS 엔트로피로 한 번만 시드됨
        let index = rand::thread_rng().gen_range(0..entries.len());
        debug!(
            function = %name,
            index = index,
            entries = entries.len(),
            "레플리카 선택"
        );

        BackendAddress::new(entries[index].to_string(), self.backend_port)
    }
}
