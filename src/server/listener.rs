use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info};
use super::exporter::MetricsExporter;
use super::handler::RequestHandler;
use super::Result;

pub struct ServerListener {
    http_listener: TcpListener,
}

impl ServerListener {
    pub async fn bind(port: u16) -> Result<Self> {
        let http_listener = TcpListener::bind(format!("0.0.0.0:{}", port))
            .await
            .map_err(|e| {
                error!(error = %e, port = port, "HTTP 포트 바인딩 실패");
                e
            })?;

        info!(port = port, "HTTP 리스너 시작");
        Ok(Self::from_listener(http_listener))
    }

    pub fn from_listener(http_listener: TcpListener) -> Self {
        Self { http_listener }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.http_listener.local_addr()?)
    }

    /// Ctrl-C 를 받을 때까지 연결을 처리합니다.
    pub async fn run(
        self,
        handler: Arc<RequestHandler>,
        exporter: Option<Arc<MetricsExporter>>,
    ) -> Result<()> {
        self.run_until(handler, exporter, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "종료 시그널 대기 실패");
                std::future::pending::<()>().await;
            }
        }).await
    }

    pub async fn run_until<F>(
        self,
        handler: Arc<RequestHandler>,
        exporter: Option<Arc<MetricsExporter>>,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = self.http_listener.accept() => {
                    match result {
                        Ok((stream, remote)) => {
                            debug!(remote = %remote, "연결 수락");
                            let handler = handler.clone();
                            let exporter = exporter.clone();
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                if let Err(err) = serve_connection(io, handler, exporter).await {
                                    error!(error = %err, "HTTP 연결 처리 실패");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "HTTP 연결 수락 실패");
                        }
                    }
                }

                _ = &mut shutdown => {
                    info!("종료 신호 수신, 리스너 중지");
                    return Ok(());
                }
            }
        }
    }
}

async fn serve_connection<I>(
    io: I,
    handler: Arc<RequestHandler>,
    exporter: Option<Arc<MetricsExporter>>,
) -> std::result::Result<(), hyper::Error>
where
    I: hyper::rt::Read + hyper::rt::Write + Send + Unpin + 'static,
{
    let service = service_fn(move |req: Request<Incoming>| {
        let handler = handler.clone();
        let exporter = exporter.clone();
        async move {
            if let Some(exporter) = exporter.as_ref().filter(|e| e.matches(&req)) {
                return Ok::<_, Infallible>(exporter.respond());
            }
            handler.handle_request(req.map(|body| body.boxed_unsync())).await
        }
    });

    // 호출자가 연결을 끊으면 진행 중인 핸들러 future가 drop되어
    // 백엔드 호출과 응답 바디도 함께 정리됨
    http1::Builder::new()
        .serve_connection(io, service)
        .await
}
