use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use tracing::error;
use crate::metrics::PrometheusMetrics;
use crate::proxy::{full, ProxyBody};

/// 같은 리스너에서 Prometheus 스크레이프 요청을 처리합니다.
#[derive(Clone)]
pub struct MetricsExporter {
    path: String,
    metrics: PrometheusMetrics,
}

impl MetricsExporter {
    pub fn new(path: impl Into<String>, metrics: PrometheusMetrics) -> Self {
        Self {
            path: path.into(),
            metrics,
        }
    }

    pub fn matches<B>(&self, req: &Request<B>) -> bool {
        *req.method() == Method::GET && req.uri().path() == self.path
    }

    pub fn respond(&self) -> Response<ProxyBody> {
        match self.metrics.gather_text() {
            Ok(text) => {
                let mut response = Response::new(full(text));
                if let Ok(value) = HeaderValue::from_str(&self.metrics.content_type()) {
                    response.headers_mut().insert(CONTENT_TYPE, value);
                }
                response
            }
            Err(e) => {
                error!(error = %e, "메트릭 인코딩 실패");
                let mut response = Response::new(full("failed to encode metrics"));
                *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }
}
