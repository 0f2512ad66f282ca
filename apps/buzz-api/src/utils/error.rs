//! 统一错误出口
//!
//! 各能力模块的错误在这里一次性映射为 HTTP 状态码与稳定的错误码：
//! - Validation → 400 `INVALID.REQUEST`
//! - Conflict → 409 `RESOURCE.CONFLICT`（含登录失败，沿用历史状态码）
//! - Unauthorized → 401 `AUTH.UNAUTHORIZED`
//! - NotFound → 404 `RESOURCE.NOT_FOUND`（含缺少头像文件，沿用历史状态码）
//! - Upstream → 501 `UPSTREAM.FAILED`
//! - Internal → 500 `INTERNAL.ERROR`（细节只写日志）

use api_contract::ApiResponse;
use axum::{
    Json,
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use buzz_auth::AuthError;
use buzz_profile::ProfileError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Unauthorized request".to_string())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID.REQUEST"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "INVALID.REQUEST"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "RESOURCE.CONFLICT"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "AUTH.UNAUTHORIZED"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "RESOURCE.NOT_FOUND"),
            AppError::Upstream(_) => (StatusCode::NOT_IMPLEMENTED, "UPSTREAM.FAILED"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL.ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "internal error".to_string()
            }
            AppError::Upstream(detail) => {
                tracing::warn!(error = %detail, "upstream request failed");
                self.to_string()
            }
            _ => self.to_string(),
        };
        (status, Json(ApiResponse::<()>::error(code, message))).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(message) => AppError::Validation(message),
            AuthError::Conflict(message) => AppError::Conflict(message),
            AuthError::InvalidCredentials => {
                AppError::Conflict("Invalid email or password".to_string())
            }
            AuthError::IncorrectPassword => AppError::Unauthorized(err.to_string()),
            AuthError::TokenExpired | AuthError::TokenInvalid => {
                AppError::Unauthorized(err.to_string())
            }
            AuthError::Provider(message) => AppError::Upstream(message),
            AuthError::Internal(message) => AppError::Internal(message),
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Validation(message) => AppError::Validation(message),
            ProfileError::Conflict(message) => AppError::Conflict(message),
            ProfileError::NotFound | ProfileError::MissingPicture => {
                AppError::NotFound(err.to_string())
            }
            ProfileError::Upstream(message) => AppError::Upstream(message),
            ProfileError::Internal(message) => AppError::Internal(message),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::Validation(rejection.body_text())
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::Validation(err.body_text())
        }
    }
}
