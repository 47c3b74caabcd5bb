use hyper::header::{HeaderMap, CONTENT_TYPE};

pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// 헤더 이름마다 대상의 값 목록을 원본 값 목록의 복사본으로 교체합니다.
///
/// 원본에 없는 대상 헤더는 그대로 남습니다.
pub fn copy_headers(destination: &mut HeaderMap, source: &HeaderMap) {
    for name in source.keys() {
        destination.remove(name);
        for value in source.get_all(name) {
            destination.append(name.clone(), value.clone());
        }
    }
}

/// 응답 `Content-Type`을 결정합니다.
///
/// 백엔드 응답 값, 요청 값, 기본값 순서로 비어 있지 않은 첫 값을 사용합니다.
pub fn negotiate_content_type(response: &HeaderMap, request: &HeaderMap, default_value: &str) -> String {
    content_type(response)
        .or_else(|| content_type(request))
        .unwrap_or(default_value)
        .to_string()
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers.get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}
