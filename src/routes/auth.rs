use crate::{
    auth::{AuthResponse, AuthService, BearerToken, CurrentUser, LoginRequest, RegisterRequest},
    error::AppError,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a new account and returns it. The password is hashed before it is
/// stored; the stored hash never appears in the response.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;

    let user = auth
        .register(&register_data.username, &register_data.password)
        .await?;

    log::info!("registered account '{}'", user.username);

    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Authenticates a username/password pair and returns a bearer token.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let user = auth
        .authenticate(&login_data.username, &login_data.password)
        .await?;
    let token = auth.issue_token(&user)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
    }))
}

/// Logout
///
/// Revokes the presented bearer token. Every later request carrying the same
/// token string is rejected, even though its signature and expiry would
/// still be valid.
#[post("/logout")]
pub async fn logout(
    auth: web::Data<AuthService>,
    token: BearerToken,
) -> Result<impl Responder, AppError> {
    auth.revoke(&token.0);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Logged out successfully"
    })))
}

/// Returns the account the presented token resolves to.
#[get("/me")]
pub async fn me(user: CurrentUser) -> impl Responder {
    HttpResponse::Ok().json(user.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryRevocationStore, TokenKeys};
    use crate::directory::MemoryAccountDirectory;
    use actix_web::test;
    use chrono::Duration;
    use serde_json::json;
    use std::sync::Arc;

    fn test_auth_service() -> Arc<AuthService> {
        Arc::new(AuthService::new(
            Arc::new(MemoryAccountDirectory::new()),
            Arc::new(MemoryRevocationStore::new()),
            TokenKeys::new("route_test_secret", Duration::minutes(30)),
        ))
    }

    #[actix_rt::test]
    async fn test_register_validation() {
        let app = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::from(test_auth_service()))
                .service(register),
        )
        .await;

        // Username with invalid characters
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "username": "bad user!",
                "password": "password123"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 422);

        // Short password
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "username": "gooduser",
                "password": "short"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 422);

        // Missing password fails deserialization
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({ "username": "gooduser" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_rt::test]
    async fn test_login_validation() {
        let app = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::from(test_auth_service()))
                .service(login),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({
                "username": "gooduser",
                "password": "123"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 422);
    }
}
