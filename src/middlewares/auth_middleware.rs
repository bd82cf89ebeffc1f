//! Bearer 액세스 토큰 인증 미들웨어
//!
//! 보호된 스코프에 `.wrap(AuthMiddleware)`으로 적용합니다.
//! 인증에 성공하면 [`AuthenticatedAccount`](crate::domain::models::AuthenticatedAccount)가
//! Request Extensions에 들어가고, 실패하면 핸들러를 호출하지 않고 401을 반환합니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// Session Guard를 요청 파이프라인에 연결하는 미들웨어
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthMiddleware;

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpResponse};
    use crate::domain::models::AuthenticatedAccount;
    use crate::domain::entities::Account;
    use crate::repositories::accounts::AccountStore;
    use crate::state::testing::test_state;
    use super::*;

    async fn whoami(account: AuthenticatedAccount) -> HttpResponse {
        HttpResponse::Ok().body(account.id().to_string())
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler() {
        let app = test_state();
        let account = Account::new_local("Ann".into(), "ann@x.com".into(), "hash".into());
        app.store.insert(&account).await.unwrap();
        let pair = app.tokens.issue_session_pair(&account.id).unwrap();

        let service = test::init_service(
            App::new()
                .app_data(web::Data::new(app.state.clone()))
                .service(web::scope("/p").wrap(AuthMiddleware).route("/me", web::get().to(whoami))),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/p/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        let body = test::call_and_read_body(&service, req).await;

        assert_eq!(body, account.id.as_bytes());
    }

    #[actix_web::test]
    async fn test_missing_or_bad_token_is_unauthorized() {
        let app = test_state();
        let service = test::init_service(
            App::new()
                .app_data(web::Data::new(app.state.clone()))
                .service(web::scope("/p").wrap(AuthMiddleware).route("/me", web::get().to(whoami))),
        )
        .await;

        let req = test::TestRequest::get().uri("/p/me").to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), 401);

        let req = test::TestRequest::get()
            .uri("/p/me")
            .insert_header(("Authorization", "Bearer nope"))
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), 401);
    }

    #[actix_web::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let app = test_state();
        let account = Account::new_local("Ann".into(), "ann@x.com".into(), "hash".into());
        app.store.insert(&account).await.unwrap();
        let pair = app.tokens.issue_session_pair(&account.id).unwrap();

        let service = test::init_service(
            App::new()
                .app_data(web::Data::new(app.state.clone()))
                .service(web::scope("/p").wrap(AuthMiddleware).route("/me", web::get().to(whoami))),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/p/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.refresh_token)))
            .to_request();
        let res = test::call_service(&service, req).await;

        assert_eq!(res.status(), 401);
    }
}
