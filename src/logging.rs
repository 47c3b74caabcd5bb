use std::path::Path;
use tracing::{info, warn, error, debug, Level, span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use crate::settings::logging::{LogFormat, LogOutput};
use crate::settings::LogSettings;

/// 설정에 따라 전역 subscriber를 초기화합니다.
///
/// 반환된 guard가 살아있는 동안에만 비동기 writer가 로그를 내보내므로
/// 프로세스 종료 시점까지 보관해야 합니다.
pub fn init_logging(settings: &LogSettings) -> WorkerGuard {
    let filter = EnvFilter::from_default_env()
        .add_directive(settings.level.into());

    let (writer, guard) = match &settings.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::File(path) => {
            let path = Path::new(path);
            let dir = path.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name()
                .map(|f| f.to_os_string())
                .unwrap_or_else(|| "function_gateway.log".into());
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let result = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    if let Err(e) = result {
        // 테스트 등에서 이미 subscriber가 설치된 경우
        eprintln!("로깅 초기화 건너뜀: {}", e);
    }

    guard
}

#[derive(Debug)]
pub struct RequestLog {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub function_name: Option<String>,
    pub status_code: u16,
    pub duration_ms: u64,
    pub backend_address: Option<String>,
    pub error: Option<String>,
}

impl RequestLog {
    pub fn new(request_id: String) -> Self {
        debug!(request_id = %request_id, "Creating new request log");
        Self {
            request_id,
            method: String::new(),
            path: String::new(),
            function_name: None,
            status_code: 0,
            duration_ms: 0,
            backend_address: None,
            error: None,
        }
    }

    pub fn with_request<B>(&mut self, req: &hyper::Request<B>) {
        self.method = req.method().to_string();
        self.path = req.uri().path().to_string();

        let content_type = req.headers()
            .get(hyper::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        info!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            content_type = %content_type,
            "Received request"
        );
    }

    pub fn with_function(&mut self, name: &str) {
        self.function_name = Some(name.to_string());
        debug!(
            request_id = %self.request_id,
            function = %name,
            "Resolved function name"
        );
    }

    pub fn with_response(&mut self, status: hyper::StatusCode) {
        self.status_code = status.as_u16();
        debug!(
            request_id = %self.request_id,
            status = %self.status_code,
            "Response status set"
        );
    }

    pub fn with_backend(&mut self, addr: impl std::fmt::Display) {
        let addr = addr.to_string();
        info!(
            request_id = %self.request_id,
            backend = %addr,
            "Selected backend"
        );
        self.backend_address = Some(addr);
    }

    pub fn with_error(&mut self, error: impl std::fmt::Display) {
        let error_msg = error.to_string();
        error!(
            request_id = %self.request_id,
            error = %error_msg,
            "Request error occurred"
        );
        self.error = Some(error_msg);
    }
}

pub fn log_request(log: &RequestLog) {
    let level = if log.error.is_some() {
        Level::ERROR
    } else if log.status_code >= 400 {
        Level::WARN
    } else {
        Level::INFO
    };

    let span = span!(
        Level::INFO,
        "request",
        request_id = %log.request_id,
        method = %log.method,
        path = %log.path,
        function = ?log.function_name,
        status = %log.status_code,
        duration_ms = %log.duration_ms
    );
    let _enter = span.enter();

    match level {
        Level::ERROR => error!(
            backend = ?log.backend_address,
            error = ?log.error,
            "Request failed"
        ),
        Level::WARN => warn!(
            backend = ?log.backend_address,
            "Request completed with warning"
        ),
        _ => info!(
            backend = ?log.backend_address,
            "Request completed successfully"
        ),
    }
}
