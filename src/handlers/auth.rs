//! Authentication HTTP Handlers
//!
//! 로그인 전에 호출되는 엔드포인트입니다. 모든 핸들러는 `web::Data<AppState>`에서
//! 계정 서비스를 꺼내 호출하고, 실패는 `AppError` 그대로 반환합니다.
//!
//! | Method | Path | 설명 |
//! |--------|------|------|
//! | POST | `/auth/register` | 로컬 가입 (인증 메일 발송) |
//! | POST | `/auth/verify-email` | 인증 토큰 확인 → 세션 발급 |
//! | POST | `/auth/resend-verification` | 인증 메일 재발송 (60초 제한) |
//! | POST | `/auth/login` | 이메일/비밀번호 로그인 |
//! | POST | `/auth/refresh` | 리프레시 토큰 교체 |
//! | POST | `/auth/forgot-password` | 재설정 메일 요청 |
//! | POST | `/auth/reset-password` | 재설정 토큰으로 새 비밀번호 설정 |
//! | GET | `/auth/google` | Google 동의 화면으로 리다이렉트 |
//! | GET | `/auth/google/login` | Google 동의 화면 URL (JSON) |
//! | GET | `/auth/google/callback` | OAuth 콜백 → 프런트엔드 로그인 페이지로 리다이렉트 |
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use actix_web::http::header;
use validator::Validate;
use crate::domain::dto::{
    AuthSessionResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, OAuthCallbackQuery,
    RefreshTokenRequest, RegisterRequest, RegisterResponse, ResendVerificationRequest,
    ResetPasswordRequest, TokenPairResponse, VerifyEmailRequest,
};
use crate::domain::dto::AccountResponse;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// 회원가입
///
/// # Endpoint
/// `POST /auth/register`
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account = state.accounts.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "가입이 완료되었습니다. 이메일로 전송된 링크로 인증을 완료해주세요".to_string(),
        account: AccountResponse::from(&account),
    }))
}

/// 이메일 인증
///
/// 성공하면 바로 로그인된 세션을 돌려줍니다.
#[post("/verify-email")]
pub async fn verify_email(
    state: web::Data<AppState>,
    payload: web::Json<VerifyEmailRequest>,
) -> AppResult<HttpResponse> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let session = state.accounts.verify_email(&payload.token).await?;

    Ok(HttpResponse::Ok().json(AuthSessionResponse::from(session)))
}

#[post("/resend-verification")]
pub async fn resend_verification(
    state: web::Data<AppState>,
    payload: web::Json<ResendVerificationRequest>,
) -> AppResult<HttpResponse> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state.accounts.resend_verification(&payload.email).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("인증 메일을 다시 보냈습니다")))
}

/// 로컬 로그인
///
/// # Endpoint
/// `POST /auth/login`
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let session = state.accounts.login(&payload.email, &payload.password).await?;

    Ok(HttpResponse::Ok().json(AuthSessionResponse::from(session)))
}

/// 토큰 갱신
///
/// 리프레시 토큰은 요청 본문 또는 `refresh_token` 쿠키에서 읽습니다.
#[post("/refresh")]
pub async fn refresh_tokens(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> AppResult<HttpResponse> {
    let refresh_token = extract_refresh_token(&req, body.as_deref())?;

    let tokens = state.accounts.refresh_tokens(&refresh_token).await?;

    Ok(HttpResponse::Ok().json(TokenPairResponse::from(tokens)))
}

/// 비밀번호 재설정 메일 요청
///
/// 계정 존재 여부와 관계없이 같은 메시지를 반환합니다.
#[post("/forgot-password")]
pub async fn forgot_password(
    state: web::Data<AppState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> AppResult<HttpResponse> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state.accounts.forgot_password(&payload.email).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "해당 이메일로 가입된 계정이 있으면 비밀번호 재설정 링크를 보냈습니다",
    )))
}

#[post("/reset-password")]
pub async fn reset_password(
    state: web::Data<AppState>,
    payload: web::Json<ResetPasswordRequest>,
) -> AppResult<HttpResponse> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state.accounts.reset_password(&payload.token, &payload.password).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "비밀번호가 재설정되었습니다. 새 비밀번호로 로그인해주세요",
    )))
}

/// Google 동의 화면으로 리다이렉트
#[get("/google")]
pub async fn google_redirect(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let url_response = state.google.get_login_url()?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url_response.login_url))
        .finish())
}

/// Google OAuth 로그인 URL 생성
///
/// # Endpoint
/// `GET /auth/google/login`
#[get("/google/login")]
pub async fn google_login_url(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let url_response = state.google.get_login_url()?;

    Ok(HttpResponse::Ok().json(url_response))
}

/// Google OAuth 콜백 처리
///
/// 결과는 항상 `FRONTEND_URL/login`으로의 302 리다이렉트입니다.
/// 성공하면 토큰을, 실패하면 `error` 코드와 메시지를 쿼리에 담습니다.
///
/// # Endpoint
/// `GET /auth/google/callback?code={code}&state={state}`
#[get("/google/callback")]
pub async fn google_oauth_callback(
    state: web::Data<AppState>,
    query: web::Query<OAuthCallbackQuery>,
) -> HttpResponse {
    let login_page = state.links.login();

    match complete_google_sign_in(&state, &query).await {
        Ok(session) => {
            let expires_in = session.tokens.expires_in.to_string();
            let params = [
                ("access_token", session.tokens.access_token.as_str()),
                ("refresh_token", session.tokens.refresh_token.as_str()),
                ("expires_in", expires_in.as_str()),
            ];
            redirect(&login_page, &params)
        }
        Err(e) => {
            log::warn!("Google OAuth 콜백 실패: {}", e);
            let message = e.public_message();
            redirect(&login_page, &[("error", e.code()), ("message", message.as_str())])
        }
    }
}

async fn complete_google_sign_in(
    state: &AppState,
    query: &OAuthCallbackQuery,
) -> AppResult<crate::domain::models::AuthSession> {
    // 사용자가 거부했거나 Google 쪽 에러
    if let Some(error) = &query.error {
        let description = query.error_description
            .as_deref()
            .unwrap_or("OAuth 인증이 취소되었거나 실패했습니다");
        log::warn!("Google OAuth 에러: {} - {}", error, description);
        return Err(AppError::Unauthorized(description.to_string()));
    }

    let (Some(code), Some(oauth_state)) = (query.code.as_deref(), query.state.as_deref()) else {
        return Err(AppError::ValidationError("code와 state가 필요합니다".to_string()));
    };

    let profile = state.google.fetch_profile(code, oauth_state).await?;
    state.accounts.sign_in_with_google(&profile).await
}

fn redirect(base: &str, params: &[(&str, &str)]) -> HttpResponse {
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    HttpResponse::Found()
        .insert_header((header::LOCATION, format!("{}?{}", base, query)))
        .finish()
}

/// HTTP 요청에서 리프레시 토큰 추출 (본문 우선, 다음은 쿠키)
fn extract_refresh_token(
    req: &HttpRequest,
    body: Option<&RefreshTokenRequest>,
) -> AppResult<String> {
    if let Some(body) = body {
        if !body.refresh_token.trim().is_empty() {
            return Ok(body.refresh_token.trim().to_string());
        }
    }

    if let Some(cookie) = req.cookie("refresh_token") {
        if !cookie.value().is_empty() {
            return Ok(cookie.value().to_string());
        }
    }

    Err(AppError::ValidationError("리프레시 토큰이 제공되지 않았습니다".to_string()))
}
