//! Function Gateway는 Docker Swarm 위에서 함수 호출을 중계하는 리버스 프록시입니다.
//!
//! # 주요 기능
//!
//! - 경로(`/function/{name}`) 또는 `X-Function` 헤더 기반 서비스 이름 추출
//! - Swarm 서비스 존재 확인 후 VIP 또는 DNS 라운드로빈으로 백엔드 선택
//! - 요청/응답 헤더와 바디 전달, 함수별 호출 메트릭 기록
//!
//! # 예제
//!
//! ```
//! use function_gateway::routing::RouteTemplate;
//!
//! let template = RouteTemplate::from_str("/function/{name}").unwrap();
//!
//! assert_eq!(template.extract("/function/echo"), Some("echo"));
//! assert_eq!(template.extract("/function/echo/extra?x=1"), Some("echo"));
//! assert_eq!(template.extract("/system/info"), None);
//! ```
//!
//! # 주소 선택
//!
//! ```
//! use function_gateway::routing::{AddressingPolicy, BackendAddress};
//!
//! assert_eq!(AddressingPolicy::from_flag(false), AddressingPolicy::Vip);
//! assert_eq!(BackendAddress::new("echo", 8080).to_string(), "echo:8080");
//! ```

pub mod logging;
pub mod metrics;
pub mod proxy;
pub mod docker;
pub mod routing;
pub mod server;
pub mod settings;
