//! Cloudinary REST 实现：签名上传 `/auto/upload` 与删除 `/<resource_type>/destroy`。

use crate::{
    MediaError, MediaStore, MediaUpload, UploadedMedia, public_id_from_url, resource_type_from_url,
};
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// 默认 `https://api.cloudinary.com`
    pub api_base: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

pub struct CloudinaryMediaStore {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryMediaStore {
    pub fn new(http: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self { http, config }
    }

    fn endpoint(&self, resource: &str, action: &str) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!(
            "{base}/v1_1/{}/{resource}/{action}",
            self.config.cloud_name
        )
    }

    /// 由资源 URL 得到删除接口地址与 public id。
    fn destroy_target(&self, url: &str) -> Result<(String, String), MediaError> {
        match (resource_type_from_url(url), public_id_from_url(url)) {
            (Some(resource_type), Some(public_id)) => {
                Ok((self.endpoint(&resource_type, "destroy"), public_id))
            }
            _ => Err(MediaError::Validation(format!("unrecognised media url: {url}"))),
        }
    }
}

/// 请求签名：参数按键名排序后以 `k=v&k=v` 拼接，追加 api secret，取 SHA-256 hex。
///
/// 账户的签名算法需设置为 SHA-256。
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|left, right| left.0.cmp(right.0));
    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    async fn upload(&self, file: MediaUpload, folder: &str) -> Result<UploadedMedia, MediaError> {
        if file.bytes.is_empty() {
            return Err(MediaError::Validation("empty file".to_string()));
        }
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", folder), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|err| MediaError::Validation(err.to_string()))?;
        }
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature);

        let response: UploadResponse = self
            .http
            .post(self.endpoint("auto", "upload"))
            .multipart(form)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(upstream_error)?
            .json()
            .await
            .map_err(upstream_error)?;
        tracing::info!(public_id = %response.public_id, "media uploaded");
        Ok(UploadedMedia {
            url: response.secure_url,
            public_id: response.public_id,
        })
    }

    async fn delete(&self, url: &str) -> Result<(), MediaError> {
        let (endpoint, public_id) = self.destroy_target(url)?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("public_id", public_id.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );
        let response: DestroyResponse = self
            .http
            .post(endpoint)
            .form(&[
                ("public_id", public_id.as_str()),
                ("api_key", self.config.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(upstream_error)?
            .json()
            .await
            .map_err(upstream_error)?;
        // "not found" 视为已删除
        match response.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::Upstream(format!("destroy returned {other}"))),
        }
    }
}

fn upstream_error(err: reqwest::Error) -> MediaError {
    tracing::warn!(error = %err, "cloudinary request failed");
    MediaError::Upstream(err.to_string())
}
