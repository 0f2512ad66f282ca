//! Google OAuth handlers
//!
//! 1. `GET /users/auth/google`：生成 state 写入临时 cookie，303 跳转到 Google 授权页
//! 2. `GET /users/auth/google/callback`：校验 state → 换码取资料 → 查找或创建用户 →
//!    建立服务端会话并签发 token 对 → 303 跳转到 protected；任何失败跳转到 failure
//! 3. `GET /users/auth/protected`：会话或 token 认证后的问候
//! 4. `GET /users/auth/google/failure`：401

use crate::AppState;
use crate::handlers::users::with_token_cookies;
use crate::middleware::require_auth;
use crate::utils::cookies::{OAUTH_STATE_COOKIE, expired, oauth_state_cookie, session_cookie};
use crate::utils::error::AppError;
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, SignedCookieJar};
use buzz_auth::{AuthTokens, random_token};
use buzz_storage::SessionRecord;
use serde::Deserialize;

pub const PROTECTED_PATH: &str = "/api/v1/users/auth/protected";
pub const FAILURE_PATH: &str = "/api/v1/users/auth/google/failure";

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// 跳转到 Google 授权页
pub async fn google_start(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let oauth_state = random_token();
    let url = state.identity.authorize_url(&oauth_state)?;
    let jar = jar.add(oauth_state_cookie(oauth_state));
    Ok((jar, Redirect::to(&url)).into_response())
}

/// OAuth 回调
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
    jar: CookieJar,
    signed: SignedCookieJar,
) -> Response {
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    let jar = jar.add(expired(OAUTH_STATE_COOKIE));

    match complete_google_login(&state, query, expected_state.as_deref()).await {
        Ok((tokens, session)) => {
            let jar = with_token_cookies(&state, jar, &tokens);
            let signed = signed.add(session_cookie(
                session.session_id,
                state.sessions.ttl_seconds(),
            ));
            (jar, signed, Redirect::to(PROTECTED_PATH)).into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, "google authentication failed");
            (jar, Redirect::to(FAILURE_PATH)).into_response()
        }
    }
}

async fn complete_google_login(
    state: &AppState,
    query: GoogleCallbackQuery,
    expected_state: Option<&str>,
) -> Result<(AuthTokens, SessionRecord), AppError> {
    if let Some(error) = query.error {
        return Err(AppError::Unauthorized(format!("provider returned {error}")));
    }
    let (Some(code), Some(returned_state)) = (query.code, query.state) else {
        return Err(AppError::Validation("code and state are required".to_string()));
    };
    if expected_state != Some(returned_state.as_str()) {
        return Err(AppError::Unauthorized("oauth state mismatch".to_string()));
    }

    let profile = state.identity.fetch_profile(&code).await?;
    let (user, tokens) = state.auth.login_with_google(&profile).await?;
    let session = state.sessions.create(&user.user_id).await?;
    tracing::info!(user_id = %user.user_id, "google login succeeded");
    Ok((tokens, session))
}

/// 认证后的问候
pub async fn protected(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let ctx = require_auth(&state, &headers).await?;
    Ok(Json(ApiResponse::<()>::message(format!("Welcome {}", ctx.full_name))).into_response())
}

pub async fn google_failure() -> AppError {
    AppError::Unauthorized("Google authentication failed".to_string())
}
