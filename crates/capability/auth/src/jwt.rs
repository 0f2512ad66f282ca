use crate::{AuthError, AuthTokens};
use domain::{AuthContext, AuthMethod};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

// 区分 access 与 refresh 的 token 类型。
const ACCESS_TOKEN_TYPE: &str = "access";
const REFRESH_TOKEN_TYPE: &str = "refresh";

/// access token claims；`username` 取账户 email。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessClaims {
    sub: String,
    username: String,
    email: String,
    full_name: String,
    exp: usize,
    token_type: String,
}

/// refresh token claims；jti 保证同一秒内签发的两个 token 不相同。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshClaims {
    sub: String,
    exp: usize,
    token_type: String,
    jti: String,
}

/// JWT 生成与校验（access / refresh 使用各自的密钥与有效期）。
pub struct JwtManager {
    access_secret: Vec<u8>,
    access_ttl_seconds: u64,
    refresh_secret: Vec<u8>,
    refresh_ttl_seconds: u64,
}

impl JwtManager {
    pub fn new(
        access_secret: String,
        access_ttl_seconds: u64,
        refresh_secret: String,
        refresh_ttl_seconds: u64,
    ) -> Self {
        Self {
            access_secret: access_secret.into_bytes(),
            access_ttl_seconds,
            refresh_secret: refresh_secret.into_bytes(),
            refresh_ttl_seconds,
        }
    }

    pub fn access_ttl_seconds(&self) -> u64 {
        self.access_ttl_seconds
    }

    pub fn refresh_ttl_seconds(&self) -> u64 {
        self.refresh_ttl_seconds
    }

    /// 基于 AuthContext 签发 access/refresh token。
    pub fn issue_tokens(&self, ctx: &AuthContext) -> Result<AuthTokens, AuthError> {
        let access = AccessClaims {
            sub: ctx.user_id.clone(),
            username: ctx.email.clone(),
            email: ctx.email.clone(),
            full_name: ctx.full_name.clone(),
            exp: expires_in(self.access_ttl_seconds),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };
        let refresh = RefreshClaims {
            sub: ctx.user_id.clone(),
            exp: expires_in(self.refresh_ttl_seconds),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            jti: Uuid::new_v4().to_string(),
        };
        Ok(AuthTokens {
            access_token: encode(&access, &self.access_secret)?,
            refresh_token: encode(&refresh, &self.refresh_secret)?,
        })
    }

    /// 解析 access token。
    pub fn decode_access(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims: AccessClaims = decode(token, &self.access_secret)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(AuthError::TokenInvalid);
        }
        Ok(AuthContext::new(
            claims.sub,
            claims.email,
            claims.full_name,
            AuthMethod::AccessToken,
        ))
    }

    /// 解析 refresh token，返回 user_id。
    pub fn decode_refresh(&self, token: &str) -> Result<String, AuthError> {
        let claims: RefreshClaims = decode(token, &self.refresh_secret)?;
        if claims.token_type != REFRESH_TOKEN_TYPE {
            return Err(AuthError::TokenInvalid);
        }
        Ok(claims.sub)
    }
}

fn encode<T: Serialize>(claims: &T, secret: &[u8]) -> Result<String, AuthError> {
    jsonwebtoken::encode(&Header::default(), claims, &EncodingKey::from_secret(secret))
        .map_err(|err| AuthError::Internal(err.to_string()))
}

fn decode<T: DeserializeOwned>(token: &str, secret: &[u8]) -> Result<T, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let decoded = jsonwebtoken::decode::<T>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(map_jwt_error)?;
    Ok(decoded.claims)
}

/// 过期时间戳；超大有效期饱和到上限。
fn expires_in(ttl_seconds: u64) -> usize {
    let exp = now_epoch_seconds().saturating_add(ttl_seconds);
    usize::try_from(exp).unwrap_or(usize::MAX)
}

/// 当前时间戳（秒）。
fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// 将 jwt 库错误映射为业务错误。
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    }
}
