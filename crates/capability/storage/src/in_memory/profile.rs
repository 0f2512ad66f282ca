//! 达人资料内存存储实现
//!
//! 仅用于本地演示和测试。以 owner_id 为键，天然保证每个用户至多一条资料。

use crate::error::StorageError;
use crate::models::ProfileRecord;
use crate::traits::ProfileStore;
use chrono::Utc;
use domain::ProfileSections;
use std::collections::HashMap;
use std::sync::RwLock;

/// 达人资料内存存储
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, ProfileRecord>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn modify<F>(&self, owner_id: &str, apply: F) -> Result<Option<ProfileRecord>, StorageError>
    where
        F: FnOnce(&mut ProfileRecord),
    {
        let mut map = self
            .profiles
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(profile) = map.get_mut(owner_id) else {
            return Ok(None);
        };
        apply(profile);
        profile.updated_at = Utc::now();
        Ok(Some(profile.clone()))
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<ProfileRecord>, StorageError> {
        Ok(self
            .profiles
            .read()
            .ok()
            .and_then(|map| map.get(owner_id).cloned()))
    }

    async fn create_profile(&self, record: ProfileRecord) -> Result<ProfileRecord, StorageError> {
        let mut map = self
            .profiles
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.owner_id) {
            return Err(StorageError::conflict("profile owner already exists"));
        }
        map.insert(record.owner_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_sections(
        &self,
        owner_id: &str,
        sections: &ProfileSections,
    ) -> Result<Option<ProfileRecord>, StorageError> {
        self.modify(owner_id, |profile| {
            profile.sections = sections.clone();
        })
    }

    async fn set_profile_picture(
        &self,
        owner_id: &str,
        url: &str,
    ) -> Result<Option<ProfileRecord>, StorageError> {
        self.modify(owner_id, |profile| {
            profile.profile_picture = Some(url.to_string());
        })
    }
}
