//! Redis 服务端会话存储实现
//!
//! 会话以 JSON 写入 `session:{session_id}`，TTL 取 `expires_at - now`，
//! 到期由 Redis 自行回收。

use crate::error::StorageError;
use crate::models::SessionRecord;
use crate::traits::SessionStore;
use chrono::Utc;
use redis::AsyncCommands;

fn session_key(session_id: &str) -> String {
    format!("session:{session_id}")
}

/// Redis 会话存储
pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub fn connect(redis_url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self::new(client))
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StorageError> {
        Ok(self.client.get_multiplexed_tokio_connection().await?)
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn save_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let ttl_seconds = (record.expires_at - Utc::now()).num_seconds();
        if ttl_seconds <= 0 {
            return Ok(());
        }
        let data =
            serde_json::to_string(record).map_err(|err| StorageError::new(err.to_string()))?;
        let mut connection = self.connection().await?;
        connection
            .set_ex::<_, _, ()>(session_key(&record.session_id), data, ttl_seconds as u64)
            .await?;
        Ok(())
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<SessionRecord>, StorageError> {
        let mut connection = self.connection().await?;
        let raw: Option<String> = connection.get(session_key(session_id)).await?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let record: SessionRecord =
            serde_json::from_str(&raw).map_err(|err| StorageError::new(err.to_string()))?;
        if record.is_expired(Utc::now()) {
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete_session(&self, session_id: &str) -> Result<bool, StorageError> {
        let mut connection = self.connection().await?;
        let removed: i64 = connection.del(session_key(session_id)).await?;
        Ok(removed > 0)
    }
}
