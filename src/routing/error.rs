use std::fmt;

/// 라우팅 설정 관련 에러를 표현하는 열거형입니다.
#[derive(Debug, PartialEq)]
pub enum RoutingError {
    /// 잘못된 라우트 템플릿
    InvalidRouteTemplate {
        template: String,
        reason: String,
    },
    /// 잘못된 헤더 이름
    InvalidHeaderName {
        header_name: String,
        error: String,
    },
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingError::InvalidRouteTemplate { template, reason } =>
                write!(f, "잘못된 라우트 템플릿: {} ({})", template, reason),
            RoutingError::InvalidHeaderName { header_name, error } =>
                write!(f, "잘못된 헤더 이름 {}: {}", header_name, error),
        }
    }
}

impl std::error::Error for RoutingError {}
