//! 认证能力：注册、登录、JWT 签发与轮换、Google OAuth、服务端会话。

mod jwt;
mod oauth;
mod password;
mod session;

use buzz_storage::{StorageError, UserRecord, UserStore};
use chrono::Utc;
use domain::{AuthContext, AuthMethod};
use std::sync::Arc;
use password::{hash_password_blocking, verify_password_blocking};
use subtle::ConstantTimeEq;

pub use jwt::JwtManager;
pub use oauth::{GoogleOAuthClient, GoogleOAuthConfig, GoogleProfile, IdentityProvider};
pub use password::{PasswordCheck, hash_password, verify_password_and_maybe_upgrade};
pub use session::{SessionManager, random_token};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("old password is incorrect")]
    IncorrectPassword,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("identity provider error: {0}")]
    Provider(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        if err.is_conflict() {
            AuthError::Conflict(err.to_string())
        } else {
            AuthError::Internal(err.to_string())
        }
    }
}

/// 登录/刷新返回的 token 结构。
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// email 统一小写、去空格后再存取。
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 由用户记录构造认证上下文。
pub fn context_of(user: &UserRecord, method: AuthMethod) -> AuthContext {
    AuthContext::new(
        user.user_id.clone(),
        user.email.clone(),
        user.full_name.clone(),
        method,
    )
}

/// 认证服务实现（基于 UserStore + JWT）。
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    jwt: JwtManager,
}

impl AuthService {
    /// 创建认证服务实例。
    pub fn new(user_store: Arc<dyn UserStore>, jwt: JwtManager) -> Self {
        Self { user_store, jwt }
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    /// 本地注册：校验字段、检查 email 唯一、写入 argon2 哈希。
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        let full_name = full_name.trim();
        let email = normalize_email(email);
        if full_name.is_empty() || email.is_empty() || password.trim().is_empty() {
            return Err(AuthError::Validation("All fields are required".to_string()));
        }
        if !email.contains('@') {
            return Err(AuthError::Validation("Invalid email address".to_string()));
        }
        if self.user_store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::Conflict("User already exists".to_string()));
        }

        let now = Utc::now();
        let record = UserRecord {
            user_id: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash: Some(hash_password_blocking(password).await?),
            full_name: full_name.to_string(),
            google_id: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        // 并发注册时由唯一索引兜底，冲突同样映射为 Conflict
        let user = self.user_store.create_user(record).await.map_err(|err| {
            if err.is_conflict() {
                AuthError::Conflict("User already exists".to_string())
            } else {
                AuthError::from(err)
            }
        })?;
        tracing::info!(user_id = %user.user_id, "user registered");
        Ok(user)
    }

    /// 登录校验并签发 token。
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthTokens), AuthError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        let user = self
            .user_store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let stored_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        let check = verify_password_blocking(stored_hash, password).await?;
        if !check.verified {
            return Err(AuthError::InvalidCredentials);
        }
        if let Some(password_hash) = check.upgrade_hash {
            let updated = self
                .user_store
                .update_password_hash(&user.user_id, &password_hash)
                .await?;
            if !updated {
                return Err(AuthError::Internal("password migration update failed".to_string()));
            }
            tracing::info!(user_id = %user.user_id, "legacy password hash upgraded");
        }
        let tokens = self.issue_and_bind(&user).await?;
        Ok((user, tokens))
    }

    /// 校验 access token 并提取 AuthContext。
    pub fn verify_access_token(&self, token: &str) -> Result<AuthContext, AuthError> {
        self.jwt.decode_access(token)
    }

    /// 使用 refresh token 换取新 token；旧 token 随即失效。
    pub async fn refresh(&self, token: &str) -> Result<(UserRecord, AuthTokens), AuthError> {
        let user_id = self.jwt.decode_refresh(token)?;
        let user = self
            .user_store
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::TokenInvalid)?;
        let matches = user
            .refresh_token
            .as_deref()
            .map(|stored| bool::from(stored.as_bytes().ct_eq(token.as_bytes())))
            .unwrap_or(false);
        if !matches {
            return Err(AuthError::TokenInvalid);
        }

        let tokens = self.issue_and_bind(&user).await?;
        Ok((user, tokens))
    }

    /// 清除服务端保存的 refresh token。
    pub async fn logout(&self, user_id: &str) -> Result<(), AuthError> {
        self.user_store.set_refresh_token(user_id, None).await?;
        Ok(())
    }

    /// 修改口令；成功后清除 refresh token，其它客户端需重新登录。
    pub async fn change_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if old_password.is_empty() || new_password.trim().is_empty() {
            return Err(AuthError::Validation(
                "oldPassword and newPassword are required".to_string(),
            ));
        }
        if old_password == new_password {
            return Err(AuthError::Validation(
                "New password must differ from the old password".to_string(),
            ));
        }
        let user = self
            .user_store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::TokenInvalid)?;
        let stored_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::IncorrectPassword)?;
        if !verify_password_blocking(stored_hash, old_password).await?.verified {
            return Err(AuthError::IncorrectPassword);
        }

        let password_hash = hash_password_blocking(new_password).await?;
        if !self
            .user_store
            .update_password_hash(user_id, &password_hash)
            .await?
        {
            return Err(AuthError::Internal("password update failed".to_string()));
        }
        self.user_store.set_refresh_token(user_id, None).await?;
        tracing::info!(user_id = %user_id, "password changed");
        Ok(())
    }

    /// Google 登录：按 googleId 查找，不存在则以主 email 建号（无口令），并签发 token。
    pub async fn login_with_google(
        &self,
        profile: &GoogleProfile,
    ) -> Result<(UserRecord, AuthTokens), AuthError> {
        let user = match self.user_store.find_by_google_id(&profile.id).await? {
            Some(user) => user,
            None => self.create_google_user(profile).await?,
        };
        let tokens = self.issue_and_bind(&user).await?;
        Ok((user, tokens))
    }

    /// 按 user_id 恢复认证上下文（会话路径）。
    pub async fn context_for_user(
        &self,
        user_id: &str,
        method: AuthMethod,
    ) -> Result<Option<AuthContext>, AuthError> {
        let user = self.user_store.find_by_id(user_id).await?;
        Ok(user.map(|user| context_of(&user, method)))
    }

    async fn create_google_user(&self, profile: &GoogleProfile) -> Result<UserRecord, AuthError> {
        let email = profile
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| !email.is_empty())
            .ok_or_else(|| AuthError::Provider("google profile has no email".to_string()))?;
        if self.user_store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::Conflict(
                "email already registered with another account".to_string(),
            ));
        }
        let full_name = profile.display_name().unwrap_or_else(|| email.clone());
        let now = Utc::now();
        let record = UserRecord {
            user_id: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash: None,
            full_name,
            google_id: Some(profile.id.clone()),
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        let user = self.user_store.create_user(record).await?;
        tracing::info!(user_id = %user.user_id, "user created from google profile");
        Ok(user)
    }

    /// 签发新 token 对并覆盖保存 refresh token。
    async fn issue_and_bind(&self, user: &UserRecord) -> Result<AuthTokens, AuthError> {
        let ctx = context_of(user, AuthMethod::AccessToken);
        let tokens = self.jwt.issue_tokens(&ctx)?;
        let updated = self
            .user_store
            .set_refresh_token(&user.user_id, Some(&tokens.refresh_token))
            .await?;
        if !updated {
            return Err(AuthError::Internal("refresh token binding update failed".to_string()));
        }
        Ok(tokens)
    }
}
