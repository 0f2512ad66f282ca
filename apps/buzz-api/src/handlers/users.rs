//! 用户相关 handlers：注册、登录、刷新 token、修改口令、登出
//!
//! ## 提供的端点
//!
//! ### 公开端点（无需认证）
//! - `POST /users/register` - 本地注册，返回用户信息（201）
//! - `POST /users/login` - 登录，写入 token cookie，并在响应体返回 token（201）
//! - `POST /users/refresh-token` - 使用 refresh token（cookie 优先，其次 body）轮换 token
//!
//! ### 私有端点
//! - `POST /users/change-password` - 修改口令，成功后旧 refresh token 失效
//! - `GET /users/logout` - 清除服务端 refresh token 与会话，删除 cookie（无身份也可调用）
//!
//! ## Token 轮换
//! 每次登录/刷新都会签发新的 access/refresh 对，并覆盖保存 refresh token，
//! 之前签发的 refresh token 随即失效。

use crate::AppState;
use crate::middleware::{optional_auth, require_auth};
use crate::utils::cookies::{
    ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, SESSION_COOKIE, expired, token_cookie,
};
use crate::utils::error::AppError;
use crate::utils::response::user_to_dto;
use api_contract::{
    ApiResponse, ChangePasswordRequest, LoginRequest, LoginResponse, RefreshTokenRequest,
    RefreshTokenResponse, RegisterRequest,
};
use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, SignedCookieJar};
use buzz_auth::AuthTokens;

/// 在 jar 中写入 access/refresh cookie
pub(crate) fn with_token_cookies(state: &AppState, jar: CookieJar, tokens: &AuthTokens) -> CookieJar {
    let jwt = state.auth.jwt();
    jar.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        jwt.access_ttl_seconds(),
    ))
    .add(token_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
        jwt.refresh_ttl_seconds(),
    ))
}

/// 注册接口
///
/// # Errors
///
/// - `400 BAD REQUEST`: 字段缺失/空白，或 email 不含 `@`
/// - `409 CONFLICT`: email 已注册
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let user = state
        .auth
        .register(
            req.full_name.as_deref().unwrap_or_default(),
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            user_to_dto(&user),
            "User registered successfully",
        )),
    )
        .into_response())
}

/// 登录接口
///
/// 成功时返回 `201 CREATED`，同时写入 `accessToken`、`refreshToken` cookie。
///
/// # Errors
///
/// - `409 CONFLICT`: email 为空、账户不存在、账户无口令或口令不匹配
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let (user, tokens) = state
        .auth
        .login(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;
    let jar = with_token_cookies(&state, jar, &tokens);
    let response = LoginResponse {
        user: user_to_dto(&user),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    };
    Ok((
        StatusCode::CREATED,
        jar,
        Json(ApiResponse::success(response, "User logged in successfully")),
    )
        .into_response())
}

/// 刷新 token
///
/// refresh token 取自 `refreshToken` cookie，缺失时读取 JSON body 的 `refreshToken`。
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<Response, AppError> {
    let from_cookie = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty());
    let token = match from_cookie {
        Some(token) => token,
        None => {
            let req: RefreshTokenRequest = if body.is_empty() {
                RefreshTokenRequest::default()
            } else {
                serde_json::from_slice(&body)
                    .map_err(|err| AppError::Validation(err.to_string()))?
            };
            req.refresh_token
                .filter(|token| !token.is_empty())
                .ok_or_else(|| AppError::Unauthorized("Refresh token is required".to_string()))?
        }
    };

    let (_, tokens) = state.auth.refresh(&token).await?;
    let jar = with_token_cookies(&state, jar, &tokens);
    let response = RefreshTokenResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    };
    Ok((
        jar,
        Json(ApiResponse::success(response, "Access token refreshed")),
    )
        .into_response())
}

/// 修改口令
///
/// # Errors
///
/// - `400 BAD REQUEST`: 字段缺失，或新旧口令相同
/// - `401 UNAUTHORIZED`: 未认证，或旧口令不匹配
pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let ctx = require_auth(&state, &headers).await?;
    let Json(req) = payload?;
    state
        .auth
        .change_password(
            &ctx.user_id,
            req.old_password.as_deref().unwrap_or_default(),
            req.new_password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(ApiResponse::<()>::message("Password changed successfully")).into_response())
}

/// 登出：清除 refresh token、销毁会话、删除 cookie
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    signed: SignedCookieJar,
) -> Result<Response, AppError> {
    if let Some(ctx) = optional_auth(&state, &headers).await? {
        state.auth.logout(&ctx.user_id).await?;
        tracing::info!(user_id = %ctx.user_id, "user logged out");
    }
    if let Some(session) = signed.get(SESSION_COOKIE) {
        state.sessions.destroy(session.value()).await?;
    }

    let jar = jar
        .add(expired(ACCESS_TOKEN_COOKIE))
        .add(expired(REFRESH_TOKEN_COOKIE))
        .add(expired(SESSION_COOKIE));
    Ok((
        jar,
        Json(ApiResponse::<()>::message("User logged out successfully")),
    )
        .into_response())
}
