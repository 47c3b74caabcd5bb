//! 선택된 백엔드로 요청을 전달하고 응답을 그대로 흘려보냅니다.

mod error;
mod headers;

pub use error::{ForwardError, ProxyError};
pub use headers::{copy_headers, negotiate_content_type, DEFAULT_CONTENT_TYPE};

use std::time::Duration;
use hyper::header::{HeaderValue, CONTENT_TYPE, HOST};
use hyper::{Request, Response};
use hyper::body::Bytes;
use http_body_util::{combinators::UnsyncBoxBody, BodyExt, Empty, Full};
use hyper_util::client::legacy;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tracing::{debug, info};
use crate::routing::BackendAddress;
use crate::settings::UpstreamSettings;

/// 인바운드/아웃바운드 양방향에서 쓰는 스트리밍 바디 타입
pub type ProxyBody = UnsyncBoxBody<Bytes, hyper::Error>;

pub fn full(chunk: impl Into<Bytes>) -> ProxyBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> ProxyBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// 프록시 전용 HTTP 클라이언트를 가진 포워더
///
/// 커넥션 풀링보다 빠른 실패를 우선합니다. keep-alive가 꺼져 있으면
/// 유휴 커넥션을 보관하지 않습니다.
#[derive(Clone)]
pub struct RequestForwarder {
    client: legacy::Client<HttpConnector, ProxyBody>,
    response_timeout: Duration,
}

impl RequestForwarder {
    pub fn new(settings: &UpstreamSettings) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(settings.connect_timeout()));
        connector.set_keepalive(None);
        connector.set_nodelay(true);

        let max_idle = if settings.keep_alive {
            settings.max_idle_connections
        } else {
            0
        };

        let client = legacy::Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(settings.idle_timeout())
            .pool_max_idle_per_host(max_idle)
            .build(connector);

        Self {
            client,
            response_timeout: settings.response_timeout(),
        }
    }

    /// 요청을 `address`로 전달합니다.
    ///
    /// 응답 헤더를 받는 즉시 반환하며 본문은 버퍼링하지 않고 스트리밍합니다.
    pub async fn forward(
        &self,
        req: Request<ProxyBody>,
        address: &BackendAddress,
    ) -> Result<Response<ProxyBody>, ForwardError> {
        let (parts, body) = req.into_parts();

        let url = build_target_url(address, &parts.uri);
        let request_content_type = parts.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        info!(content_type = %request_content_type, url = %url, "Forwarding request");

        let mut outbound = Request::builder()
            .method(parts.method.clone())
            .uri(url)
            .body(body)?;

        copy_headers(outbound.headers_mut(), &parts.headers);
        // Host는 대상 URI에서 다시 채워짐
        outbound.headers_mut().remove(HOST);

        let response = match tokio::time::timeout(self.response_timeout, self.client.request(outbound)).await {
            Ok(result) => result?,
            Err(_) => return Err(ForwardError::Timeout(self.response_timeout)),
        };

        let (res_parts, res_body) = response.into_parts();
        debug!(status = %res_parts.status, "Backend responded");

        let mut outer = Response::new(res_body.boxed_unsync());
        *outer.status_mut() = res_parts.status;
        copy_headers(outer.headers_mut(), &res_parts.headers);

        let content_type = negotiate_content_type(&res_parts.headers, &parts.headers, DEFAULT_CONTENT_TYPE);
        if let Ok(value) = HeaderValue::from_str(&content_type) {
            outer.headers_mut().insert(CONTENT_TYPE, value);
        }

        Ok(outer)
    }
}

fn build_target_url(address: &BackendAddress, uri: &hyper::Uri) -> String {
    let path_and_query = uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!("http://{}{}", address, path_and_query)
}
