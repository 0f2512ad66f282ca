//! 存储接口 Trait 定义
//!
//! - UserStore：用户存储
//! - ProfileStore：达人资料存储
//! - SessionStore：服务端会话存储
//!
//! 设计原则：
//! - 唯一性（email、google_id、profile owner）由存储层在写入时保证，
//!   违反时返回冲突错误（`StorageError::is_conflict`）
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{ProfileRecord, SessionRecord, UserRecord};
use async_trait::async_trait;
use domain::ProfileSections;

/// 用户存储接口
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 根据 email 查找用户（调用方负责规范化为小写、去空格）
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    async fn find_by_google_id(&self, google_id: &str)
    -> Result<Option<UserRecord>, StorageError>;

    /// 创建用户；email 或 google_id 重复时返回冲突错误
    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError>;

    /// 更新口令哈希
    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError>;

    /// 读取当前有效的 refresh token
    async fn get_refresh_token(&self, user_id: &str) -> Result<Option<String>, StorageError>;

    /// 覆盖（或清空）当前有效的 refresh token
    async fn set_refresh_token(
        &self,
        user_id: &str,
        refresh_token: Option<&str>,
    ) -> Result<bool, StorageError>;
}

/// 达人资料存储接口
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<ProfileRecord>, StorageError>;

    /// 创建资料；同一 owner 已存在时返回冲突错误
    async fn create_profile(&self, record: ProfileRecord) -> Result<ProfileRecord, StorageError>;

    /// 整体写入合并后的分区
    async fn update_sections(
        &self,
        owner_id: &str,
        sections: &ProfileSections,
    ) -> Result<Option<ProfileRecord>, StorageError>;

    /// 仅更新头像 URL
    async fn set_profile_picture(
        &self,
        owner_id: &str,
        url: &str,
    ) -> Result<Option<ProfileRecord>, StorageError>;
}

/// 服务端会话存储接口
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save_session(&self, record: &SessionRecord) -> Result<(), StorageError>;

    /// 查找会话（已过期视为不存在）
    async fn find_session(&self, session_id: &str) -> Result<Option<SessionRecord>, StorageError>;

    async fn delete_session(&self, session_id: &str) -> Result<bool, StorageError>;
}
