//! 媒体中转能力：把上传的图片转存到对象存储（Cloudinary），并按 URL 删除。

mod cloudinary;
mod in_memory;

use async_trait::async_trait;

pub use cloudinary::{CloudinaryConfig, CloudinaryMediaStore, sign_params};
pub use in_memory::InMemoryMediaStore;

/// 头像上传目录。
pub const PROFILE_FOLDER: &str = "BuzzVerse/profiles";

/// 媒体中转错误。
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("invalid media request: {0}")]
    Validation(String),
    #[error("media upstream error: {0}")]
    Upstream(String),
}

/// 待上传的文件。
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
}

/// 上传结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub url: String,
    pub public_id: String,
}

/// 对象存储抽象。
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, file: MediaUpload, folder: &str) -> Result<UploadedMedia, MediaError>;

    /// 按公开 URL 删除资源。
    async fn delete(&self, url: &str) -> Result<(), MediaError>;
}

/// 从资源 URL 推导 public id：取 `/upload/` 之后的路径，
/// 跳过 `v<数字>` 版本段，去掉扩展名，保留目录。
pub fn public_id_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.collect();
    let upload_idx = segments.iter().position(|segment| *segment == "upload")?;
    let mut rest = &segments[upload_idx + 1..];
    if let Some(first) = rest.first() {
        if is_version_segment(first) {
            rest = &rest[1..];
        }
    }
    let (last, dirs) = rest.split_last()?;
    let stem = match last.rfind('.') {
        Some(idx) if idx > 0 => &last[..idx],
        _ => *last,
    };
    if stem.is_empty() || dirs.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    let mut parts: Vec<&str> = dirs.to_vec();
    parts.push(stem);
    Some(parts.join("/"))
}

/// 资源类型：`/upload/` 前一段（image、video、raw）。
pub fn resource_type_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.collect();
    let upload_idx = segments.iter().position(|segment| *segment == "upload")?;
    let resource_type = segments.get(upload_idx.checked_sub(1)?)?;
    if resource_type.is_empty() {
        return None;
    }
    Some((*resource_type).to_string())
}

fn is_version_segment(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|ch| ch.is_ascii_digit())
}
