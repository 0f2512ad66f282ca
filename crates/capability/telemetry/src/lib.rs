//! 追踪初始化与请求 ID 生成。

use tracing_subscriber::{EnvFilter, fmt};

/// 响应头：请求 ID。
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// 响应头：追踪 ID。
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// 上游传入的请求 ID 最长保留长度。
const MAX_INCOMING_ID_LEN: usize = 128;

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 初始化 tracing（默认 info，可由 `RUST_LOG` 覆盖）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 沿用上游（网关/前端）传入的 request_id；缺失或不合法时重新生成。
pub fn request_ids_from(incoming_request_id: Option<&str>) -> RequestIds {
    let mut ids = new_request_ids();
    if let Some(incoming) = incoming_request_id.map(str::trim) {
        let acceptable = !incoming.is_empty()
            && incoming.len() <= MAX_INCOMING_ID_LEN
            && incoming
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
        if acceptable {
            ids.request_id = incoming.to_string();
        }
    }
    ids
}
