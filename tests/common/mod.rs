#![allow(dead_code)]

use std::convert::Infallible;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::{Frame, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use function_gateway::routing::{DnsResolver, ResolveError, ServiceResolver};
use function_gateway::server::ServerManager;
use function_gateway::settings::Settings;

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// 서비스 존재 여부 응답을 고정한 Mock
pub enum Lookup {
    Exists,
    Absent,
    Fails,
}

pub struct MockResolver {
    lookup: Lookup,
    calls: AtomicUsize,
}

impl MockResolver {
    pub fn new(lookup: Lookup) -> Arc<Self> {
        Arc::new(Self {
            lookup,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceResolver for MockResolver {
    async fn exists(&self, _name: &str) -> Result<bool, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.lookup {
            Lookup::Exists => Ok(true),
            Lookup::Absent => Ok(false),
            Lookup::Fails => Err("docker daemon unavailable".into()),
        }
    }
}

/// DNS 조회 결과를 고정한 Mock
pub enum DnsAnswer {
    Entries(Vec<IpAddr>),
    Fails,
    Hangs,
}

pub struct MockDns {
    answer: DnsAnswer,
    queried: Mutex<Vec<String>>,
}

impl MockDns {
    pub fn new(answer: DnsAnswer) -> Arc<Self> {
        Arc::new(Self {
            answer,
            queried: Mutex::new(Vec::new()),
        })
    }

    pub fn localhost() -> Arc<Self> {
        Self::new(DnsAnswer::Entries(vec![LOCALHOST]))
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsResolver for MockDns {
    async fn lookup_ip(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        self.queried.lock().unwrap().push(host.to_string());
        match &self.answer {
            DnsAnswer::Entries(entries) => Ok(entries.clone()),
            DnsAnswer::Fails => Err(io::Error::new(io::ErrorKind::NotFound, "no such host")),
            DnsAnswer::Hangs => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(vec![LOCALHOST])
            }
        }
    }
}

/// 요청 내용을 헤더로 되돌려주는 테스트용 백엔드를 띄웁니다.
///
/// - `X-Echo-Method`, `X-Echo-Uri`, `X-Echo-Host`: 받은 요청 정보
/// - `X-Echo-Custom`: 받은 `X-Custom` 값들을 그대로 반복
/// - 본문: 받은 본문 그대로
/// - `/function/teapot`: 418 + `application/json`
pub async fn spawn_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(echo))
                    .await;
            });
        }
    });

    addr
}

async fn echo(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    if parts.uri.path() == "/function/teapot" {
        return Ok(Response::builder()
            .status(StatusCode::IM_A_TEAPOT)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from_static(b"{\"short\":\"stout\"}")))
            .unwrap());
    }

    let mut builder = Response::builder()
        .header("X-Echo-Method", parts.method.as_str())
        .header("X-Echo-Uri", parts.uri.to_string())
        .header("Set-Cookie", "a=1")
        .header("Set-Cookie", "b=2");

    if let Some(host) = parts.headers.get("host") {
        builder = builder.header("X-Echo-Host", host.clone());
    }
    for value in parts.headers.get_all("x-custom") {
        builder = builder.header("X-Echo-Custom", value.clone());
    }

    let bytes = body.collect().await.map(|c| c.to_bytes()).unwrap_or_default();
    Ok(builder.body(Full::new(bytes)).unwrap())
}

/// 채널로 받은 청크를 그대로 흘려보내는 응답 바디
struct ChannelBody {
    rx: Option<mpsc::Receiver<Bytes>>,
}

impl hyper::body::Body for ChannelBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, Infallible>>> {
        match self.rx.as_mut() {
            Some(rx) => rx.poll_recv(cx).map(|chunk| chunk.map(|bytes| Ok(Frame::data(bytes)))),
            None => Poll::Ready(None),
        }
    }
}

/// 응답 본문을 송신 측이 보내는 만큼만 내보내는 백엔드를 띄웁니다.
///
/// 송신 측을 drop하면 본문이 끝납니다. 첫 요청만 채널을 받습니다.
pub async fn spawn_streaming_backend() -> (SocketAddr, mpsc::Sender<Bytes>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel::<Bytes>(4);
    let receiver = Arc::new(Mutex::new(Some(rx)));

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let receiver = receiver.clone();
            tokio::spawn(async move {
                let service = service_fn(move |_req: Request<Incoming>| {
                    let rx = receiver.lock().unwrap().take();
                    async move {
                        Ok::<_, Infallible>(Response::new(ChannelBody { rx }))
                    }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    (addr, tx)
}

/// 아무도 듣지 않는 로컬 포트
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// DNS 라운드로빈으로 `backend_port`의 로컬 백엔드를 가리키는 설정
pub fn local_settings(backend_port: u16) -> Settings {
    let mut settings = Settings::default();
    settings.routing.dns_round_robin = true;
    settings.upstream.backend_port = backend_port;
    settings.upstream.connect_timeout_ms = 500;
    settings
}

pub fn manager(
    settings: Settings,
    resolver: Arc<MockResolver>,
    dns: Arc<MockDns>,
) -> ServerManager {
    ServerManager::new(settings, resolver, dns).unwrap()
}
