use function_gateway::{
    logging::init_logging,
    server::ServerManager,
    settings::Settings,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match Settings::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("설정 로드 실패: {}", e);
            std::process::exit(1);
        }
    };

    // guard가 살아 있는 동안만 비동기 로그가 flush됨
    let _guard = init_logging(&config.logging);
    info!(port = config.server.http_port, "Function Gateway 시작");

    let manager = match ServerManager::create(config).await {
        Ok(manager) => manager,
        Err(e) => {
            error!(error = %e, "서버 초기화 실패");
            std::process::exit(1);
        }
    };

    if let Err(e) = manager.start().await {
        error!(error = %e, "서버 실행 실패");
        std::process::exit(1);
    }

    info!("Function Gateway 종료");
}
