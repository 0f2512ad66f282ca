//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers（挂载在 `/api/v1` 下）：
//! - 健康检查：/health
//! - 用户接口：/users/register, /users/login, /users/refresh-token,
//!   /users/change-password, /users/logout
//! - Google OAuth：/users/auth/google, /users/auth/google/callback,
//!   /users/auth/protected, /users/auth/google/failure
//! - 达人资料：/profiles/create, /profiles/update, /profiles/uploadProfile

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};

/// 创建 API 路由；上传接口的请求体上限单独设置。
pub fn create_api_router(upload_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/refresh-token", post(refresh_token))
        .route("/users/change-password", post(change_password))
        .route("/users/logout", get(logout))
        .route("/users/auth/google", get(google_start))
        .route("/users/auth/google/callback", get(google_callback))
        .route("/users/auth/protected", get(protected))
        .route("/users/auth/google/failure", get(google_failure))
        .route("/profiles/create", post(create_profile))
        .route("/profiles/update", patch(update_profile))
        .route(
            "/profiles/uploadProfile",
            patch(upload_profile_picture).layer(DefaultBodyLimit::max(upload_max_bytes)),
        )
}
