//! 服务端会话：OAuth 登录后以随机 session id 写入 SessionStore，带 TTL。

use crate::AuthError;
use buzz_storage::{SessionRecord, SessionStore};
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};
use std::sync::Arc;

// 会话时长上限：一年
const MAX_SESSION_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// 随机令牌（32 字节，hex 编码），用于 session id 与 OAuth state。
pub fn random_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl_seconds: u64,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, ttl_seconds: u64) -> Self {
        Self { store, ttl_seconds }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// 为用户建立新会话。
    pub async fn create(&self, user_id: &str) -> Result<SessionRecord, AuthError> {
        let ttl = self.ttl_seconds.min(MAX_SESSION_TTL_SECONDS) as i64;
        let record = SessionRecord {
            session_id: random_token(),
            user_id: user_id.to_string(),
            expires_at: Utc::now() + Duration::seconds(ttl),
        };
        self.store.save_session(&record).await?;
        Ok(record)
    }

    /// 查找未过期的会话。
    pub async fn resolve(&self, session_id: &str) -> Result<Option<SessionRecord>, AuthError> {
        Ok(self.store.find_session(session_id).await?)
    }

    pub async fn destroy(&self, session_id: &str) -> Result<bool, AuthError> {
        Ok(self.store.delete_session(session_id).await?)
    }
}
