//! 계정/인증 서비스 메인 애플리케이션
//!
//! 환경 설정을 읽어 MongoDB 저장소와 알림 발송기를 조립하고,
//! `AppState`를 공유하는 Actix-web HTTP 서버를 구동합니다.

use std::io;
use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use account_auth_backend::config::ServerConfig;
use account_auth_backend::db::Database;
use account_auth_backend::repositories::accounts::MongoAccountStore;
use account_auth_backend::routes::configure_all_routes;
use account_auth_backend::services::notifications::{HttpNotifier, LogNotifier, Notifier};
use account_auth_backend::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 계정 인증 서비스 시작중...");

    let state = build_state().await?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(state).await
}

/// 저장소, 발송기, 서비스들을 조립합니다
///
/// MongoDB 연결 또는 인덱스 생성에 실패하면 서버를 띄우지 않습니다.
async fn build_state() -> io::Result<AppState> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::from_env()
        .await
        .map_err(|e| io::Error::other(format!("데이터베이스 연결 실패: {}", e)))?;

    info!("✅ MongoDB 연결 성공");

    let store = MongoAccountStore::new(&database);
    store
        .create_indexes()
        .await
        .map_err(|e| io::Error::other(format!("인덱스 생성 실패: {}", e)))?;

    let notifier: Arc<dyn Notifier> = match HttpNotifier::from_env() {
        Some(notifier) => Arc::new(notifier),
        None => {
            warn!("MAIL_API_URL 미설정: 메일 대신 로그로 링크를 출력합니다");
            Arc::new(LogNotifier)
        }
    };

    Ok(AppState::from_env(Arc::new(store), notifier))
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(state: AppState) -> io::Result<()> {
    let bind_address = (ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{}:{} 에서 실행중입니다", bind_address.0, bind_address.1);
    info!("📍 Health check: http://{}:{}/health", bind_address.0, bind_address.1);

    let per_second = ServerConfig::rate_limit_per_second();
    let burst_size = ServerConfig::rate_limit_burst_size();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(per_second)
        .burst_size(burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limiting 설정이 올바르지 않습니다 (0 값 불가)"))?;

    info!("🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개", per_second, burst_size);

    let allowed_origins = ServerConfig::cors_allowed_origins();
    if allowed_origins.is_empty() {
        error!("CORS_ALLOWED_ORIGINS가 비어 있어 교차 출처 요청이 모두 거부됩니다");
    }
    let state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&allowed_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(state.clone())
            .configure(configure_all_routes)
    })
        .bind(bind_address)?
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// `RUST_LOG`가 없으면 `info,actix_web=debug`를 사용합니다.
///
/// ```bash
/// RUST_LOG=account_auth_backend::services=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// CORS 설정을 구성합니다
///
/// 허용 Origin은 `CORS_ALLOWED_ORIGINS` (쉼표 구분)에서 읽습니다.
/// 리프레시 토큰 쿠키 때문에 자격 증명을 허용합니다.
fn configure_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
    }
    cors
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
