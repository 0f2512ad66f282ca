//! 内存对象存储（测试与无凭证本地运行）。

use crate::{MediaError, MediaStore, MediaUpload, UploadedMedia, public_id_from_url};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

const BASE_URL: &str = "https://res.cloudinary.com/in-memory/image/upload/v1";

#[derive(Default)]
pub struct InMemoryMediaStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    fail_uploads: bool,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有上传都返回上游错误。
    pub fn failing() -> Self {
        Self {
            objects: RwLock::default(),
            fail_uploads: true,
        }
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.objects
            .read()
            .map(|map| map.contains_key(public_id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn extension_of(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && !ext.is_empty() && ext.chars().all(|ch| ch.is_ascii_alphanumeric()) =>
        {
            ext
        }
        _ => "bin",
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn upload(&self, file: MediaUpload, folder: &str) -> Result<UploadedMedia, MediaError> {
        if self.fail_uploads {
            return Err(MediaError::Upstream("upload rejected".to_string()));
        }
        if file.bytes.is_empty() {
            return Err(MediaError::Validation("empty file".to_string()));
        }
        let folder = folder.trim_matches('/');
        let public_id = format!("{folder}/{}", uuid::Uuid::new_v4().simple());
        let url = format!("{BASE_URL}/{public_id}.{}", extension_of(&file.file_name));
        let mut map = self
            .objects
            .write()
            .map_err(|_| MediaError::Upstream("lock failed".to_string()))?;
        map.insert(public_id.clone(), file.bytes);
        Ok(UploadedMedia { url, public_id })
    }

    async fn delete(&self, url: &str) -> Result<(), MediaError> {
        let public_id = public_id_from_url(url)
            .ok_or_else(|| MediaError::Validation(format!("unrecognised media url: {url}")))?;
        let mut map = self
            .objects
            .write()
            .map_err(|_| MediaError::Upstream("lock failed".to_string()))?;
        map.remove(&public_id);
        Ok(())
    }
}
