//! Google OAuth2 授权码流程：构造授权跳转地址、换取访问令牌、读取 userinfo。

use crate::AuthError;
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
const GOOGLE_SCOPES: &str = "openid email profile";

/// userinfo 返回的用户资料（OpenID Connect 字段）。
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    #[serde(rename = "sub")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl GoogleProfile {
    /// 显示名缺失时退化为 email 的本地部分。
    pub fn display_name(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
    }
}

/// 第三方身份提供方，便于在测试中替换。
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 授权跳转地址（携带 state）。
    fn authorize_url(&self, state: &str) -> Result<String, AuthError>;

    /// 用回调中的授权码换取用户资料。
    async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, AuthError>;
}

#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// 基于 reqwest 的 Google 客户端。
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    config: GoogleOAuthConfig,
}

impl GoogleOAuthClient {
    pub fn new(http: reqwest::Client, config: GoogleOAuthConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl IdentityProvider for GoogleOAuthClient {
    fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            GOOGLE_AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", GOOGLE_SCOPES),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|err| AuthError::Internal(err.to_string()))?;
        Ok(url.to_string())
    }

    async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, AuthError> {
        let token: TokenResponse = self
            .http
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(provider_error)?
            .json()
            .await
            .map_err(provider_error)?;

        self.http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(provider_error)?
            .json::<GoogleProfile>()
            .await
            .map_err(provider_error)
    }
}

fn provider_error(err: reqwest::Error) -> AuthError {
    AuthError::Provider(err.to_string())
}
