//! 数据模型
//!
//! - 用户模型：UserRecord
//! - 达人资料模型：ProfileRecord
//! - 服务端会话：SessionRecord

use chrono::{DateTime, Utc};
use domain::ProfileSections;

/// 用户记录。
///
/// `password_hash` 为空表示纯 OAuth 账户；`refresh_token` 为当前唯一有效的刷新令牌。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub full_name: String,
    pub google_id: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 达人资料记录（每个用户至多一条）。
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub profile_id: String,
    pub owner_id: String,
    pub sections: ProfileSections,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 服务端会话记录（OAuth 浏览器流程）。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
