use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use hyper::{Method, Request, Response, StatusCode};
use tracing::{error, info, warn};
use uuid::Uuid;
use crate::{
    logging::{log_request, RequestLog},
    metrics::Metrics,
    proxy::{ProxyBody, ProxyError, RequestForwarder},
    routing::{BackendAddressSelector, ServiceNameExtractor, ServiceResolver},
};

/// 함수 호출 요청의 진입점
///
/// 서비스 이름 추출 → 존재 확인 → 주소 선택 → 전달 순서로 처리하고
/// 이름이 확인된 요청마다 결과 코드와 소요 시간을 한 번씩 기록합니다.
pub struct RequestHandler {
    extractor: ServiceNameExtractor,
    resolver: Arc<dyn ServiceResolver>,
    selector: BackendAddressSelector,
    forwarder: RequestForwarder,
    metrics: Arc<dyn Metrics>,
}

impl RequestHandler {
    pub fn new(
        extractor: ServiceNameExtractor,
        resolver: Arc<dyn ServiceResolver>,
        selector: BackendAddressSelector,
        forwarder: RequestForwarder,
        metrics: Arc<dyn Metrics>,
    ) -> Self {
        Self {
            extractor,
            resolver,
            selector,
            forwarder,
            metrics,
        }
    }

    pub async fn handle_request(
        &self,
        req: Request<ProxyBody>,
    ) -> Result<Response<ProxyBody>, Infallible> {
        let start_time = Instant::now();
        let mut log = RequestLog::new(Uuid::new_v4().to_string());
        log.with_request(&req);

        // 1. 메서드 검사 (서비스 이름을 알기 전이므로 메트릭 없음)
        let method = req.method().clone();
        let response = match method {
            Method::GET | Method::POST => {
                // 2. 서비스 이름 추출
                let name = self.extractor.extract(&req);
                if name.is_empty() {
                    ProxyError::MissingServiceName.to_response()
                } else {
                    log.with_function(&name);
                    self.lookup_invoke(&name, req, &mut log).await
                }
            }
            _ => ProxyError::MethodNotAllowed(method).to_response(),
        };

        log.with_response(response.status());
        log.duration_ms = start_time.elapsed().as_millis() as u64;
        log_request(&log);

        Ok(response)
    }

    async fn lookup_invoke(
        &self,
        name: &str,
        req: Request<ProxyBody>,
        log: &mut RequestLog,
    ) -> Response<ProxyBody> {
        let started = Instant::now();

        let response = match self.resolve_and_forward(name, req, log).await {
            Ok(response) => response,
            Err(e) => {
                if e.status().is_server_error() {
                    log.with_error(&e);
                }
                e.to_response()
            }
        };

        // 결과가 확정된 뒤 마지막으로 기록
        self.track(name, response.status(), started.elapsed());
        response
    }

    async fn resolve_and_forward(
        &self,
        name: &str,
        req: Request<ProxyBody>,
        log: &mut RequestLog,
    ) -> Result<Response<ProxyBody>, ProxyError> {
        match self.resolver.exists(name).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(function = %name, "서비스를 찾을 수 없음");
                return Err(ProxyError::NotFound {
                    name: name.to_string(),
                    source: None,
                });
            }
            Err(e) => {
                error!(function = %name, error = %e, "Could not resolve service");
                return Err(ProxyError::NotFound {
                    name: name.to_string(),
                    source: Some(e),
                });
            }
        }

        let address = self.selector.select(name).await;
        log.with_backend(&address);

        self.forwarder.forward(req, &address).await
            .map_err(|e| ProxyError::UpstreamUnreachable {
                name: name.to_string(),
                source: e,
            })
    }

    // 기록 실패는 이미 결정된 응답에 영향을 주지 않음
    fn track(&self, name: &str, status: StatusCode, elapsed: Duration) {
        if let Err(e) = self.metrics.record_invocation(name, status.as_u16()) {
            warn!(function = %name, error = %e, "호출 카운터 기록 실패");
        }

        if let Err(e) = self.metrics.record_duration(name, elapsed) {
            warn!(function = %name, error = %e, "소요 시간 기록 실패");
        }

        info!(
            function = %name,
            code = status.as_u16(),
            seconds = elapsed.as_secs_f64(),
            "[{}] took {:.6} seconds", name, elapsed.as_secs_f64()
        );
    }
}
