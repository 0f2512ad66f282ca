//! Buzz API 服务入口：加载配置、装配存储与服务、启动 HTTP 监听。

use axum::http::HeaderValue;
use axum_extra::extract::cookie::Key;
use buzz_api::{AppState, HttpSettings, build_router};
use buzz_auth::{AuthService, GoogleOAuthClient, GoogleOAuthConfig, JwtManager, SessionManager};
use buzz_config::AppConfig;
use buzz_media::{CloudinaryConfig, CloudinaryMediaStore};
use buzz_profile::ProfileService;
use buzz_storage::{PgProfileStore, PgUserStore, RedisSessionStore, connect_pool};
use buzz_telemetry::init_tracing;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // Postgres 用户/资料存储（需先执行 migrations/0001_init.sql）
    let pool = connect_pool(&config.database_url).await?;
    let user_store = Arc::new(PgUserStore::new(pool.clone()));
    let profile_store = Arc::new(PgProfileStore::new(pool));
    // Redis 会话存储
    let session_store = Arc::new(RedisSessionStore::connect(&config.redis_url)?);

    // 外部调用共用一个 HTTP 客户端
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_client_timeout_seconds))
        .build()?;

    let jwt = JwtManager::new(
        config.access_token_secret.clone(),
        config.access_token_ttl_seconds,
        config.refresh_token_secret.clone(),
        config.refresh_token_ttl_seconds,
    );
    let auth = Arc::new(AuthService::new(user_store, jwt));
    let sessions = Arc::new(SessionManager::new(session_store, config.session_ttl_seconds));
    let media = Arc::new(CloudinaryMediaStore::new(
        http.clone(),
        CloudinaryConfig {
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
            api_base: None,
        },
    ));
    let profiles = Arc::new(ProfileService::new(profile_store, media));
    let identity = Arc::new(GoogleOAuthClient::new(
        http,
        GoogleOAuthConfig {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            callback_url: config.google_callback_url.clone(),
        },
    ));

    let state = AppState {
        auth,
        sessions,
        profiles,
        identity,
        cookie_key: Key::derive_from(config.session_secret.as_bytes()),
    };
    let settings = HttpSettings {
        cors_origin: Some(HeaderValue::from_str(&config.cors_origin)?),
        upload_max_bytes: config.upload_max_bytes,
    };
    let app = build_router(state, &settings);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(addr = %config.http_addr, "buzz-api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
