//! Admin login and sessions.

use chrono::{DateTime, Utc};
use geek_auth::{clear_session_cookie, session_cookie, session_token};
use serde::{Deserialize, Serialize};

use super::Context;
use crate::error::ApiError;
use crate::response::ApiResponse;

#[derive(Debug, Deserialize)]
struct Login {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoggedIn<'a> {
    token: &'a str,
    email: &'a str,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo<'a> {
    email: &'a str,
    expires_at: DateTime<Utc>,
}

/// Anything that is not `{email, password}` fails like a wrong password.
pub async fn login(ctx: &Context<'_>) -> Result<ApiResponse, ApiError> {
    let login: Login =
        serde_json::from_value(ctx.request.json()?).map_err(|_| ApiError::InvalidCredentials)?;

    if let Err(err) = ctx.app.config.admin.verify(&login.email, &login.password) {
        ctx.logger
            .warn_builder("Login failed")
            .field("email", login.email.trim())
            .emit();
        return Err(ApiError::from_auth(err));
    }

    let session = ctx
        .app
        .sessions
        .create(&ctx.app.config.admin.email)
        .map_err(ApiError::from_auth)?;
    ctx.logger
        .info_builder("Admin logged in")
        .field("email", session.email.as_str())
        .emit();

    let cookie = session_cookie(session.id.as_str(), ctx.app.sessions.ttl().num_seconds());
    Ok(ApiResponse::ok(&LoggedIn {
        token: session.id.as_str(),
        email: &session.email,
        expires_at: session.expires_at,
    })
    .with_header("set-cookie", cookie))
}

/// Always succeeds: an unknown or missing session is already logged out.
pub async fn logout(ctx: &Context<'_>) -> Result<ApiResponse, ApiError> {
    let request = ctx.request;
    if let Some(token) = session_token(request.header("authorization"), request.header("cookie")) {
        ctx.app.sessions.revoke(&token).map_err(ApiError::from_auth)?;
        ctx.logger.info("Admin logged out");
    }
    Ok(ApiResponse::no_content().with_header("set-cookie", clear_session_cookie()))
}

pub async fn session(ctx: &Context<'_>) -> Result<ApiResponse, ApiError> {
    let session = ctx.app.authenticate(ctx.request)?;
    Ok(ApiResponse::ok(&SessionInfo {
        email: &session.email,
        expires_at: session.expires_at,
    }))
}
