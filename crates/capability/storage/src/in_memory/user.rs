//! 用户内存存储实现
//!
//! 仅用于本地演示和测试。email / google_id 唯一性在同一把写锁内检查并插入。

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::traits::UserStore;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

/// 用户内存存储
///
/// 使用 RwLock + HashMap（user_id → UserRecord）提供线程安全的内存存储。
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_by<F>(&self, predicate: F) -> Option<UserRecord>
    where
        F: Fn(&UserRecord) -> bool,
    {
        self.users
            .read()
            .ok()
            .and_then(|map| map.values().find(|user| predicate(user)).cloned())
    }

    fn modify<F>(&self, user_id: &str, apply: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut UserRecord),
    {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get_mut(user_id) {
            Some(user) => {
                apply(user);
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .users
            .read()
            .ok()
            .and_then(|map| map.get(user_id).cloned()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.find_by(|user| user.email == email))
    }

    async fn find_by_google_id(
        &self,
        google_id: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.find_by(|user| user.google_id.as_deref() == Some(google_id)))
    }

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.user_id) {
            return Err(StorageError::conflict("user_id already exists"));
        }
        if map.values().any(|user| user.email == record.email) {
            return Err(StorageError::conflict("email already exists"));
        }
        if let Some(google_id) = record.google_id.as_deref() {
            if map
                .values()
                .any(|user| user.google_id.as_deref() == Some(google_id))
            {
                return Err(StorageError::conflict("google_id already exists"));
            }
        }
        map.insert(record.user_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        self.modify(user_id, |user| {
            user.password_hash = Some(password_hash.to_string());
        })
    }

    async fn get_refresh_token(&self, user_id: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .users
            .read()
            .ok()
            .and_then(|map| map.get(user_id).and_then(|user| user.refresh_token.clone())))
    }

    async fn set_refresh_token(
        &self,
        user_id: &str,
        refresh_token: Option<&str>,
    ) -> Result<bool, StorageError> {
        self.modify(user_id, |user| {
            user.refresh_token = refresh_token.map(str::to_string);
        })
    }
}
