use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::middleware::BearerToken;
use crate::error::AppError;
use crate::models::User;

/// Extracts the authenticated principal from request extensions.
///
/// Intended for routes behind `AuthMiddleware`, which resolves the bearer
/// token and inserts the account into extensions. If the principal is absent
/// (middleware not applied), this extractor returns `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ActixError; // AppError is converted via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(CurrentUser(user))),
            None => {
                let err = AppError::Unauthorized(
                    "No authenticated account on request. Ensure AuthMiddleware is active."
                        .to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}

impl FromRequest for BearerToken {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<BearerToken>().cloned() {
            Some(token) => ready(Ok(token)),
            None => {
                let err = AppError::Unauthorized("No bearer token on request.".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
