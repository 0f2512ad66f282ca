//! 认证中间件与辅助函数
//!
//! - request_context：请求上下文中间件，注入 request_id/trace_id
//! - bearer_token：从 Authorization 头提取 Bearer token
//! - require_auth：统一认证，接受 Bearer token、accessToken cookie 或服务端会话
//! - optional_auth：同上，但无身份时返回 None（logout 使用）
//!
//! 认证顺序：
//! 1. Authorization: Bearer <access>
//! 2. accessToken cookie
//! 3. connect.sid 签名 cookie → SessionStore → 用户

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::{CookieJar, SignedCookieJar};
use buzz_telemetry::{REQUEST_ID_HEADER, TRACE_ID_HEADER, request_ids_from};
use domain::{AuthContext, AuthMethod};
use tracing::{Instrument, info_span};

use crate::AppState;
use crate::utils::cookies::{ACCESS_TOKEN_COOKIE, SESSION_COOKIE};
use crate::utils::error::AppError;

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let incoming = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    let ids = request_ids_from(incoming);
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response: Response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        REQUEST_ID_HEADER,
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        TRACE_ID_HEADER,
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 从请求头中提取 Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header_value = headers.get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// 验证并提取认证上下文
pub async fn require_auth(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, AppError> {
    optional_auth(state, headers)
        .await?
        .ok_or_else(AppError::unauthorized)
}

/// 尝试提取认证上下文；token 无效且无会话时返回 None
pub async fn optional_auth(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<AuthContext>, AppError> {
    let jar = CookieJar::from_headers(headers);
    let token = bearer_token(headers)
        .map(str::to_string)
        .or_else(|| jar.get(ACCESS_TOKEN_COOKIE).map(|cookie| cookie.value().to_string()));
    if let Some(token) = token {
        match state.auth.verify_access_token(&token) {
            Ok(ctx) => return Ok(Some(ctx)),
            Err(err) => tracing::debug!(error = %err, "access token rejected"),
        }
    }

    let signed = SignedCookieJar::from_headers(headers, state.cookie_key.clone());
    let Some(session_id) = signed
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
    else {
        return Ok(None);
    };
    let Some(session) = state.sessions.resolve(&session_id).await? else {
        return Ok(None);
    };
    Ok(state
        .auth
        .context_for_user(&session.user_id, AuthMethod::Session)
        .await?)
}
