//! 达人资料 handlers（均需认证）
//!
//! - `POST /profiles/create`：创建资料（201），已存在返回 409
//! - `PATCH /profiles/update`：按分区浅合并更新，资料不存在返回 404
//! - `PATCH /profiles/uploadProfile`：multipart 字段 `profilePicture` 上传头像，
//!   缺少文件返回 404，上游失败返回 501

use crate::AppState;
use crate::middleware::require_auth;
use crate::utils::error::AppError;
use crate::utils::response::profile_to_dto;
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use buzz_media::MediaUpload;
use serde_json::Value;

const PICTURE_FIELD: &str = "profilePicture";

pub async fn create_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let ctx = require_auth(&state, &headers).await?;
    let Json(body) = payload?;
    let profile = state.profiles.create(&ctx.user_id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            profile_to_dto(profile),
            "Profile created successfully",
        )),
    )
        .into_response())
}

pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let ctx = require_auth(&state, &headers).await?;
    let Json(patch) = payload?;
    let profile = state.profiles.update(&ctx.user_id, patch).await?;
    Ok(Json(ApiResponse::success(
        profile_to_dto(profile),
        "Profile updated successfully",
    ))
    .into_response())
}

pub async fn upload_profile_picture(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let ctx = require_auth(&state, &headers).await?;

    // 非 multipart 请求按缺少文件处理
    let mut picture = None;
    if let Ok(mut multipart) = multipart {
        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(PICTURE_FIELD) {
                continue;
            }
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            picture = Some(MediaUpload {
                bytes: bytes.to_vec(),
                file_name,
                content_type,
            });
            break;
        }
    }

    let profile = state.profiles.attach_picture(&ctx.user_id, picture).await?;
    Ok(Json(ApiResponse::success(
        profile_to_dto(profile),
        "Profile picture updated successfully",
    ))
    .into_response())
}
