//! Registration and login handlers.

use actix_web::{HttpResponse, web};

use quill_core::services::Registration;
use quill_shared::ApiResponse;
use quill_shared::dto::{LoginRequest, LoginResponse, RegisterRequest};

use super::views;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/users/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .auth
        .register(Registration {
            username: req.username,
            password: req.password,
            email: req.email,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        views::user(&user),
        "User registered successfully",
    )))
}

/// POST /api/users/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let outcome = state.auth.login(&req.username, &req.password).await?;

    let response = LoginResponse {
        token: outcome.token.token,
        token_type: "Bearer".to_string(),
        expires: outcome.token.expires_at.timestamp(),
        expires_in: state.auth.tokens().expiration_seconds(),
        user: views::user_summary(&outcome.user),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        response,
        "User login successfully",
    )))
}
