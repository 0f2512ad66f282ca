//! 达人资料能力：创建、分区浅合并更新、头像挂载。

mod merge;

use buzz_media::{MediaError, MediaStore, MediaUpload, PROFILE_FOLDER};
use buzz_storage::{ProfileRecord, ProfileStore, StorageError};
use chrono::Utc;
use domain::ProfileSections;
use serde_json::Value;
use std::sync::Arc;

pub use merge::merge_sections;

/// 资料相关错误。
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Profile not found")]
    NotFound,
    #[error("Profile picture is required")]
    MissingPicture,
    #[error("upload failed: {0}")]
    Upstream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ProfileError {
    fn from(err: StorageError) -> Self {
        if err.is_conflict() {
            ProfileError::Conflict("Profile already exists".to_string())
        } else {
            ProfileError::Internal(err.to_string())
        }
    }
}

impl From<MediaError> for ProfileError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Validation(message) => ProfileError::Validation(message),
            MediaError::Upstream(message) => ProfileError::Upstream(message),
        }
    }
}

pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    media: Arc<dyn MediaStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>, media: Arc<dyn MediaStore>) -> Self {
        Self { store, media }
    }

    pub async fn find(&self, owner_id: &str) -> Result<ProfileRecord, ProfileError> {
        self.store
            .find_by_owner(owner_id)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    /// 创建资料；每个用户至多一条。
    pub async fn create(&self, owner_id: &str, body: Value) -> Result<ProfileRecord, ProfileError> {
        if self.store.find_by_owner(owner_id).await?.is_some() {
            return Err(ProfileError::Conflict("Profile already exists".to_string()));
        }
        let sections: ProfileSections =
            serde_json::from_value(body).map_err(|err| ProfileError::Validation(err.to_string()))?;
        sections.validate().map_err(ProfileError::Validation)?;

        let now = Utc::now();
        let record = ProfileRecord {
            profile_id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            sections,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        };
        let profile = self.store.create_profile(record).await?;
        tracing::info!(owner_id = %owner_id, profile_id = %profile.profile_id, "profile created");
        Ok(profile)
    }

    /// 按分区浅合并更新。
    pub async fn update(&self, owner_id: &str, patch: Value) -> Result<ProfileRecord, ProfileError> {
        let existing = self.find(owner_id).await?;
        let merged =
            merge_sections(&existing.sections, &patch).map_err(ProfileError::Validation)?;
        self.store
            .update_sections(owner_id, &merged)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    /// 上传头像并写入 profilePicture；旧头像在新 URL 保存后删除。
    pub async fn attach_picture(
        &self,
        owner_id: &str,
        file: Option<MediaUpload>,
    ) -> Result<ProfileRecord, ProfileError> {
        let file = file
            .filter(|file| !file.bytes.is_empty())
            .ok_or(ProfileError::MissingPicture)?;
        let existing = self.find(owner_id).await?;

        let uploaded = self.media.upload(file, PROFILE_FOLDER).await?;
        let Some(profile) = self
            .store
            .set_profile_picture(owner_id, &uploaded.url)
            .await?
        else {
            self.discard(&uploaded.url).await;
            return Err(ProfileError::NotFound);
        };

        if let Some(previous) = existing.profile_picture.as_deref() {
            if previous != uploaded.url {
                self.discard(previous).await;
            }
        }
        Ok(profile)
    }

    async fn discard(&self, url: &str) {
        if let Err(err) = self.media.delete(url).await {
            tracing::warn!(url = %url, error = %err, "failed to delete media");
        }
    }
}
