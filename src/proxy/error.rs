use std::time::Duration;
use hyper::{Method, Response, StatusCode};
use crate::routing::ResolveError;
use super::{empty, full, ProxyBody};

/// 백엔드 호출 단계의 실패
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("요청 생성 실패: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("백엔드 호출 실패: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("응답 대기 시간 초과 ({0:?})")]
    Timeout(Duration),
}

/// 요청 하나를 끝내는 에러. 모두 HTTP 상태로 변환되며 재시도하지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("허용되지 않는 메서드: {0}")]
    MethodNotAllowed(Method),

    #[error("Provide an x-function header or valid route /function/function_name.")]
    MissingServiceName,

    /// 서비스가 없거나 조회 자체가 실패한 경우 (호출자에게는 같은 결과)
    #[error("Cannot find service: {name}.")]
    NotFound {
        name: String,
        #[source]
        source: Option<ResolveError>,
    },

    #[error("Can't reach service: {name}")]
    UpstreamUnreachable {
        name: String,
        #[source]
        source: ForwardError,
    },
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::MissingServiceName => StatusCode::BAD_REQUEST,
            ProxyError::NotFound { .. } => StatusCode::NOT_FOUND,
            ProxyError::UpstreamUnreachable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 에러를 최종 응답으로 변환합니다. 405는 본문 없이 응답합니다.
    pub fn to_response(&self) -> Response<ProxyBody> {
        let body = match self {
            ProxyError::MethodNotAllowed(_) => empty(),
            other => full(other.to_string()),
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status();
        response
    }
}
