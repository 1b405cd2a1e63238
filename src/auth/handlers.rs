use actix_web::{HttpResponse, Responder, web};
use tracing::{error, info, instrument};

use crate::auth::jwt::decode_claims;
use crate::client::BackendGateway;
use crate::config::Config;
use crate::error::AppError;
use crate::model::role::Role;
use crate::models::{LoginReqDto, LoginResponse};

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in; token plus dashboard to open", body = LoginResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials"),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(gateway, config, user), fields(email = %user.email))]
pub async fn login(
    user: web::Json<LoginReqDto>,
    gateway: web::Data<BackendGateway>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    info!("Login request received");

    if user.email.trim().is_empty() || user.password.is_empty() {
        return Err(AppError::Validation("Email and password are required".to_string()).into());
    }

    let token = gateway.login(&user).await.map_err(|e| {
        error!(error = %e, "Login rejected");
        e
    })?;

    // The backend owns the signature; a bad token here means a broken backend.
    let claims = decode_claims(&token, config.jwt_secret.as_deref())
        .map_err(|e| AppError::Backend(format!("backend issued an unreadable token: {e}")))?;
    let redirect = Role::home_for_claim(&claims.role).to_string();

    info!(role = %claims.role, redirect = %redirect, "Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse { token, redirect }))
}
