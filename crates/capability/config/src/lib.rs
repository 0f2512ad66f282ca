//! 应用运行配置加载。
//!
//! 所有变量以 `BUZZ_` 为前缀；时长类变量接受纯秒数或 `<n>s|m|h|d`。

use std::env;

const PREFIX: &str = "BUZZ_";

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_GOOGLE_CALLBACK_URL: &str = "http://localhost:3000/api/v1/users/auth/google/callback";
const DEFAULT_SESSION_TTL_SECONDS: u64 = 24 * 60 * 60;
const DEFAULT_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_HTTP_CLIENT_TIMEOUT_SECONDS: u64 = 30;

/// 会话签名密钥最短长度（cookie 签名 key 派生要求）。
pub const MIN_SESSION_SECRET_BYTES: usize = 32;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: String,
    pub redis_url: String,
    pub cors_origin: String,
    pub session_secret: String,
    pub session_ttl_seconds: u64,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_callback_url: String,
    pub access_token_secret: String,
    pub access_token_ttl_seconds: u64,
    pub refresh_token_secret: String,
    pub refresh_token_ttl_seconds: u64,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub upload_max_bytes: usize,
    pub http_client_timeout_seconds: u64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（键为带前缀的完整变量名）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = Source { lookup };

        let session_secret = source.required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_BYTES {
            return Err(ConfigError::Invalid(
                source.key("SESSION_SECRET"),
                format!("must be at least {MIN_SESSION_SECRET_BYTES} bytes"),
            ));
        }

        Ok(Self {
            http_addr: source.with_default("HTTP_ADDR", DEFAULT_HTTP_ADDR),
            database_url: source.required("DATABASE_URL")?,
            redis_url: source.with_default("REDIS_URL", DEFAULT_REDIS_URL),
            cors_origin: source.required("CORS_ORIGIN")?,
            session_secret,
            session_ttl_seconds: source
                .duration_with_default("SESSION_TTL", DEFAULT_SESSION_TTL_SECONDS)?,
            google_client_id: source.required("GOOGLE_CLIENT_ID")?,
            google_client_secret: source.required("GOOGLE_CLIENT_SECRET")?,
            google_callback_url: source
                .with_default("GOOGLE_CALLBACK_URL", DEFAULT_GOOGLE_CALLBACK_URL),
            access_token_secret: source.required("ACCESS_TOKEN_SECRET")?,
            access_token_ttl_seconds: source.duration("ACCESS_TOKEN_EXPIRY")?,
            refresh_token_secret: source.required("REFRESH_TOKEN_SECRET")?,
            refresh_token_ttl_seconds: source.duration("REFRESH_TOKEN_EXPIRY")?,
            cloudinary_cloud_name: source.required("CLOUDINARY_CLOUD_NAME")?,
            cloudinary_api_key: source.required("CLOUDINARY_API_KEY")?,
            cloudinary_api_secret: source.required("CLOUDINARY_API_SECRET")?,
            upload_max_bytes: source
                .usize_with_default("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?,
            http_client_timeout_seconds: source.duration_with_default(
                "HTTP_CLIENT_TIMEOUT",
                DEFAULT_HTTP_CLIENT_TIMEOUT_SECONDS,
            )?,
        })
    }
}

struct Source<F> {
    lookup: F,
}

impl<F> Source<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn key(&self, name: &str) -> String {
        format!("{PREFIX}{name}")
    }

    /// 读取非空值；空字符串视为未设置。
    fn optional(&self, name: &str) -> Option<String> {
        match (self.lookup)(&self.key(name)) {
            Some(value) if !value.trim().is_empty() => Some(value),
            _ => None,
        }
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.optional(name)
            .ok_or_else(|| ConfigError::Missing(self.key(name)))
    }

    fn with_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn duration(&self, name: &str) -> Result<u64, ConfigError> {
        let value = self.required(name)?;
        parse_duration_seconds(&value).ok_or_else(|| ConfigError::Invalid(self.key(name), value))
    }

    fn duration_with_default(&self, name: &str, default: u64) -> Result<u64, ConfigError> {
        match self.optional(name) {
            Some(value) => parse_duration_seconds(&value)
                .ok_or_else(|| ConfigError::Invalid(self.key(name), value)),
            None => Ok(default),
        }
    }

    fn usize_with_default(&self, name: &str, default: usize) -> Result<usize, ConfigError> {
        let value = match self.optional(name) {
            Some(value) => value,
            None => return Ok(default),
        };
        value
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::Invalid(self.key(name), value))
    }
}

/// 解析时长为秒数：`3600`、`90s`、`15m`、`1h`、`10d`。零值视为非法。
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, ch)) if ch.is_ascii_alphabetic() => (&raw[..idx], Some(ch)),
        Some(_) => (raw, None),
        None => return None,
    };
    let amount = digits.trim().parse::<u64>().ok()?;
    let multiplier = match unit.map(|ch| ch.to_ascii_lowercase()) {
        None | Some('s') => 1,
        Some('m') => 60,
        Some('h') => 60 * 60,
        Some('d') => 24 * 60 * 60,
        Some(_) => return None,
    };
    amount.checked_mul(multiplier).filter(|value| *value > 0)
}
