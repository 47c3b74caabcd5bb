use regex_lite as regex;
use crate::routing::error::RoutingError;

const NAME_VARIABLE: &str = "{name}";

/// `/function/{name}` 형태의 라우트 템플릿입니다.
///
/// `{name}` 변수는 `[-a-zA-Z_0-9]+` 로 제한되며, 템플릿 뒤의 하위 경로는 허용합니다.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    pub pattern: String,
    regex: regex::Regex,
}

impl RouteTemplate {
    pub fn from_str(pattern: &str) -> Result<Self, RoutingError> {
        let (prefix, suffix) = pattern.split_once(NAME_VARIABLE)
            .ok_or_else(|| RoutingError::InvalidRouteTemplate {
                template: pattern.to_string(),
                reason: format!("{} 변수가 없음", NAME_VARIABLE),
            })?;

        if !prefix.starts_with('/') {
            return Err(RoutingError::InvalidRouteTemplate {
                template: pattern.to_string(),
                reason: "템플릿은 '/'로 시작해야 함".to_string(),
            });
        }

        if suffix.contains('{') {
            return Err(RoutingError::InvalidRouteTemplate {
                template: pattern.to_string(),
                reason: "변수는 하나만 사용할 수 있음".to_string(),
            });
        }

        let source = format!(
            "^{}(?P<name>[-a-zA-Z_0-9]+){}(?:/.*)?$",
            regex::escape(prefix),
            regex::escape(suffix.trim_end_matches('/')),
        );

        let regex = regex::Regex::new(&source)
            .map_err(|e| RoutingError::InvalidRouteTemplate {
                template: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// 경로에서 `{name}` 값을 꺼냅니다. 템플릿과 맞지 않으면 `None`.
    pub fn extract<'a>(&self, path: &'a str) -> Option<&'a str> {
        self.regex.captures(path)
            .and_then(|caps| caps.name("name"))
            .map(|m| m.as_str())
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl PartialEq for RouteTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for RouteTemplate {}
