//! Session token issuance.

use actix_web::{HttpResponse, web};

use nexthire_shared::SuccessResponse;
use nexthire_shared::dto::TokenRequest;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::telemetry::mask_email;

/// POST /jwt
pub async fn issue_token(
    state: web::Data<AppState>,
    body: web::Json<TokenRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    let token = state
        .tokens
        .generate_token(&req.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_email = %mask_email(&req.email), "Session token issued");

    Ok(HttpResponse::Ok()
        .cookie(state.cookies.session(token, state.tokens.expiration_seconds()))
        .json(SuccessResponse::ok()))
}

/// GET /logout
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(state.cookies.removal())
        .json(SuccessResponse::ok())
}
