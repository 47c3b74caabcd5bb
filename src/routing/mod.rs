//! 서비스 이름 추출, 존재 확인, 백엔드 주소 선택을 담당하는 모듈입니다.

mod error;
mod name;
mod resolver;
mod selector;
mod template;

pub use error::RoutingError;
pub use name::ServiceNameExtractor;
pub use resolver::{ResolveError, ServiceResolver};
pub use selector::{AddressingPolicy, BackendAddress, BackendAddressSelector, DnsResolver, SystemDnsResolver};
pub use template::RouteTemplate;
