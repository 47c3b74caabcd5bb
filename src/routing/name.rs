use hyper::header::HeaderName;
use hyper::Request;
use crate::routing::{RouteTemplate, RoutingError};
use crate::settings::{RoutingMode, RoutingSettings};

/// 요청에서 논리 서비스 이름을 꺼내는 전략입니다. 시작 시 한 번 결정됩니다.
#[derive(Debug, Clone)]
pub enum ServiceNameExtractor {
    /// 라우트 템플릿의 `{name}` 경로 변수
    Wildcard(RouteTemplate),
    /// 전용 헤더의 첫 번째 값
    Header(HeaderName),
}

impl ServiceNameExtractor {
    pub fn from_settings(settings: &RoutingSettings) -> Result<Self, RoutingError> {
        match settings.mode {
            RoutingMode::Wildcard => Ok(Self::Wildcard(RouteTemplate::from_str(&settings.route_template)?)),
            RoutingMode::Header => Self::header(&settings.function_header),
        }
    }

    pub fn header(name: &str) -> Result<Self, RoutingError> {
        HeaderName::from_bytes(name.as_bytes())
            .map(Self::Header)
            .map_err(|e| RoutingError::InvalidHeaderName {
                header_name: name.to_string(),
                error: e.to_string(),
            })
    }

    /// 서비스 이름을 추출합니다. 이름이 없거나 비어 있으면 빈 문자열을 반환합니다.
    pub fn extract<B>(&self, req: &Request<B>) -> String {
        match self {
            Self::Wildcard(template) => template.extract(req.uri().path())
                .unwrap_or_default()
                .to_string(),
            Self::Header(header) => req.headers()
                .get(header)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.trim().to_string())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(path: &str, function: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = function {
            builder = builder.header("X-Function", value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_wildcard_mode() {
        let extractor = ServiceNameExtractor::from_settings(&RoutingSettings::default()).unwrap();

        assert_eq!(extractor.extract(&request("/function/echo", None)), "echo");
        assert_eq!(extractor.extract(&request("/function/echo?x=1", Some("other"))), "echo");
        assert_eq!(extractor.extract(&request("/", Some("echo"))), "");
    }

    #[test]
    fn test_header_mode() {
        let settings = RoutingSettings {
            mode: RoutingMode::Header,
            ..Default::default()
        };
        let extractor = ServiceNameExtractor::from_settings(&settings).unwrap();

        assert_eq!(extractor.extract(&request("/", Some("echo"))), "echo");
        assert_eq!(extractor.extract(&request("/function/other", None)), "");
        assert_eq!(extractor.extract(&request("/", Some(""))), "");
    }

    #[test]
    fn test_header_mode_uses_first_value() {
        let extractor = ServiceNameExtractor::header("X-Function").unwrap();
        let req = Request::builder()
            .uri("/")
            .header("X-Function", "first")
            .header("X-Function", "second")
            .body(())
            .unwrap();

        assert_eq!(extractor.extract(&req), "first");
    }

    #[test]
    fn test_invalid_header_name() {
        assert!(matches!(
            ServiceNameExtractor::header("bad header"),
            Err(RoutingError::InvalidHeaderName { .. })
        ));
    }
}
