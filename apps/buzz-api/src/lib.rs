//! Buzz HTTP API：用户注册登录、token 刷新、Google OAuth、达人资料与头像上传。

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use axum::extract::FromRef;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware as axum_middleware};
use axum_extra::extract::cookie::Key;
use buzz_auth::{AuthService, IdentityProvider, SessionManager};
use buzz_profile::ProfileService;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// JSON 请求体上限（上传接口单独配置）。
pub const JSON_BODY_LIMIT: usize = 16 * 1024;

/// 应用共享状态。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub sessions: Arc<SessionManager>,
    pub profiles: Arc<ProfileService>,
    pub identity: Arc<dyn IdentityProvider>,
    /// 服务端会话 cookie 的签名密钥
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// 路由层面的 HTTP 设置。
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub cors_origin: Option<HeaderValue>,
    pub upload_max_bytes: usize,
}

/// 组装完整路由（`/api/v1` 前缀 + 中间件）。
pub fn build_router(state: AppState, settings: &HttpSettings) -> Router {
    let mut app = Router::new()
        .nest("/api/v1", routes::create_api_router(settings.upload_max_bytes))
        .with_state(state)
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(axum_middleware::from_fn(middleware::request_context));

    if let Some(origin) = settings.cors_origin.clone() {
        let cors = CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
        app = app.layer(cors);
    }
    app
}
