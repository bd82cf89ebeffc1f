use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use crate::domain::entities::Account;

/// Session Guard가 확인한 요청의 계정
///
/// 인증 미들웨어가 Request Extensions에 넣어 두고, 핸들러는 추출자로 꺼내 씁니다.
/// 요청마다 저장소에서 새로 읽은 값이며 요청 간에 캐시하지 않습니다.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub Account);

impl AuthenticatedAccount {
    pub fn id(&self) -> &str {
        &self.0.id
    }
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedAccount {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedAccount>() {
            Some(account) => ready(Ok(account.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "인증되지 않은 요청입니다"
            ))),
        }
    }
}
