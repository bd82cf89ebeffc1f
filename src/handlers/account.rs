//! Account HTTP Handlers
//!
//! `AuthMiddleware` 뒤에서 동작하는 엔드포인트입니다.
//! 요청의 계정은 [`AuthenticatedAccount`] 추출자로 받습니다.
//!
//! | Method | Path | 설명 |
//! |--------|------|------|
//! | GET | `/account/me` | 현재 계정 정보 |
//! | POST | `/account/logout` | 리프레시 토큰 폐기 |
//! | PUT | `/account/password` | 비밀번호 변경 |
//! | PUT | `/account/email` | 이메일 변경 (재인증 필요) |
//! | DELETE | `/account` | 계정 삭제 |
use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;
use crate::domain::dto::{
    AccountResponse, ChangePasswordRequest, DeleteAccountRequest, LogoutRequest, MessageResponse,
    UpdateEmailRequest,
};
use crate::domain::models::AuthenticatedAccount;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// 현재 인증된 계정 조회
///
/// # Endpoint
/// `GET /account/me`
#[get("/me")]
pub async fn get_me(
    state: web::Data<AppState>,
    current: AuthenticatedAccount,
) -> AppResult<HttpResponse> {
    let account = state.accounts.get_profile(current.id()).await?;

    Ok(HttpResponse::Ok().json(AccountResponse::from(&account)))
}

/// 로그아웃
///
/// 본문이 없거나 `refresh_token`이 없으면 아무 것도 폐기하지 않고 성공합니다.
#[post("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    current: AuthenticatedAccount,
    body: Option<web::Json<LogoutRequest>>,
) -> AppResult<HttpResponse> {
    let refresh_token = body.and_then(|b| b.into_inner().refresh_token);

    state.accounts.logout(current.id(), refresh_token.as_deref()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("로그아웃되었습니다")))
}

#[put("/password")]
pub async fn change_password(
    state: web::Data<AppState>,
    current: AuthenticatedAccount,
    payload: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state
        .accounts
        .change_password(current.id(), &payload.current_password, &payload.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("비밀번호가 변경되었습니다")))
}

/// 이메일 변경
///
/// 새 주소로 인증 메일이 발송되며, 인증 전까지는 로컬 로그인이 막힙니다.
#[put("/email")]
pub async fn update_email(
    state: web::Data<AppState>,
    current: AuthenticatedAccount,
    payload: web::Json<UpdateEmailRequest>,
) -> AppResult<HttpResponse> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account = state.accounts.update_email(current.id(), &payload.email).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "이메일이 변경되었습니다. 새 주소로 전송된 링크로 인증을 완료해주세요",
        "account": AccountResponse::from(&account),
    })))
}

#[delete("")]
pub async fn delete_account(
    state: web::Data<AppState>,
    current: AuthenticatedAccount,
    body: Option<web::Json<DeleteAccountRequest>>,
) -> AppResult<HttpResponse> {
    let password = body.and_then(|b| b.into_inner().password);

    state.accounts.delete_account(current.id(), password.as_deref()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("계정이 삭제되었습니다")))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use crate::domain::models::TokenPair;
    use crate::routes::configure_all_routes;
    use crate::services::accounts::account_service::test_support::{register_request, PASSWORD};
    use crate::services::notifications::NotificationKind;
    use crate::state::testing::{test_state, TestApp};

    /// 가입 + 인증을 서비스로 직접 수행하고 발급된 토큰을 돌려줌
    async fn signed_in(app: &TestApp, email: &str) -> TokenPair {
        app.state.accounts.register(register_request("Ann", email)).await.unwrap();
        let token = app.notifier.last_token(NotificationKind::Verification).unwrap();
        app.state.accounts.verify_email(&token).await.unwrap().tokens
    }

    macro_rules! app {
        ($test_app:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($test_app.state.clone()))
                    .configure(configure_all_routes),
            )
            .await
        };
    }

    fn bearer(tokens: &TokenPair) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", tokens.access_token))
    }

    #[actix_web::test]
    async fn test_me_requires_token() {
        let test_app = test_state();
        let service = app!(test_app);

        let req = test::TestRequest::get().uri("/api/v1/account/me").to_request();
        let res = test::call_service(&service, req).await;

        assert_eq!(res.status(), 401);
    }

    #[actix_web::test]
    async fn test_me_returns_public_projection() {
        let test_app = test_state();
        let tokens = signed_in(&test_app, "ann@x.com").await;
        let service = app!(test_app);

        let req = test::TestRequest::get()
            .uri("/api/v1/account/me")
            .insert_header(bearer(&tokens))
            .to_request();
        let body: Value = test::call_and_read_body_json(&service, req).await;

        assert_eq!(body["email"], "ann@x.com");
        assert_eq!(body["email_verified"], true);
        assert!(body.get("refresh_tokens").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[actix_web::test]
    async fn test_logout_then_refresh_is_forbidden() {
        let test_app = test_state();
        let tokens = signed_in(&test_app, "ann@x.com").await;
        let service = app!(test_app);

        let req = test::TestRequest::post()
            .uri("/api/v1/account/logout")
            .insert_header(bearer(&tokens))
            .set_json(json!({"refresh_token": tokens.refresh_token}))
            .to_request();
        assert_eq!(test::call_service(&service, req).await.status(), 200);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({"refresh_token": tokens.refresh_token}))
            .to_request();
        assert_eq!(test::call_service(&service, req).await.status(), 403);
    }

    #[actix_web::test]
    async fn test_logout_without_body() {
        let test_app = test_state();
        let tokens = signed_in(&test_app, "ann@x.com").await;
        let service = app!(test_app);

        let req = test::TestRequest::post()
            .uri("/api/v1/account/logout")
            .insert_header(bearer(&tokens))
            .to_request();

        assert_eq!(test::call_service(&service, req).await.status(), 200);
    }

    #[actix_web::test]
    async fn test_change_password_wrong_current() {
        let test_app = test_state();
        let tokens = signed_in(&test_app, "ann@x.com").await;
        let service = app!(test_app);

        let req = test::TestRequest::put()
            .uri("/api/v1/account/password")
            .insert_header(bearer(&tokens))
            .set_json(json!({"current_password": "nope-nope-1", "new_password": "battery-staple-2"}))
            .to_request();
        let res = test::call_service(&service, req).await;

        assert_eq!(res.status(), 400);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "incorrect_password");
    }

    #[actix_web::test]
    async fn test_update_email_same_address() {
        let test_app = test_state();
        let tokens = signed_in(&test_app, "ann@x.com").await;
        let service = app!(test_app);

        let req = test::TestRequest::put()
            .uri("/api/v1/account/email")
            .insert_header(bearer(&tokens))
            .set_json(json!({"email": "ann@x.com"}))
            .to_request();
        let res = test::call_service(&service, req).await;

        assert_eq!(res.status(), 400);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "email_unchanged");
    }

    #[actix_web::test]
    async fn test_delete_account_with_password() {
        let test_app = test_state();
        let tokens = signed_in(&test_app, "ann@x.com").await;
        let service = app!(test_app);

        let req = test::TestRequest::delete()
            .uri("/api/v1/account")
            .insert_header(bearer(&tokens))
            .set_json(json!({"password": PASSWORD}))
            .to_request();
        assert_eq!(test::call_service(&service, req).await.status(), 200);
        assert!(test_app.store.is_empty());

        // 삭제된 계정의 액세스 토큰은 더 이상 통과하지 못함
        let req = test::TestRequest::get()
            .uri("/api/v1/account/me")
            .insert_header(bearer(&tokens))
            .to_request();
        assert_eq!(test::call_service(&service, req).await.status(), 401);
    }
}
