use axum::{Json, response::IntoResponse};

/// 健康检查端点：只反映进程存活，返回 `{"ok": true}`。
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
