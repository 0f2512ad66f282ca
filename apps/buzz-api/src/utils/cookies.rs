//! Cookie 名称与构造
//!
//! token cookie 与会话 cookie 均为 http-only + secure，路径 `/`。

use axum_extra::extract::cookie::{Cookie, SameSite};
use cookie::time::Duration;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";
pub const SESSION_COOKIE: &str = "connect.sid";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

const OAUTH_STATE_TTL_MINUTES: i64 = 10;

fn seconds(value: u64) -> Duration {
    Duration::seconds(i64::try_from(value).unwrap_or(i64::MAX))
}

/// accessToken / refreshToken
pub fn token_cookie(name: &'static str, value: String, max_age_seconds: u64) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .path("/")
        .max_age(seconds(max_age_seconds))
        .build()
}

/// connect.sid（写入 SignedCookieJar）
pub fn session_cookie(session_id: String, max_age_seconds: u64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(seconds(max_age_seconds))
        .build()
}

/// OAuth 回调前暂存的 state
pub fn oauth_state_cookie(state: String) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, state))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::minutes(OAUTH_STATE_TTL_MINUTES))
        .build()
}

/// 立即过期的同名同路径 cookie；无论请求是否携带都会下发
pub fn expired(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, ""))
        .http_only(true)
        .secure(true)
        .path("/")
        .build();
    cookie.make_removal();
    cookie
}
