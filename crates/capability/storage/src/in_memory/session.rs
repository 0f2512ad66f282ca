//! 会话内存存储实现（用于测试与本地占位）。

use crate::error::StorageError;
use crate::models::SessionRecord;
use crate::traits::SessionStore;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let mut map = self
            .sessions
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.insert(record.session_id.clone(), record.clone());
        Ok(())
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<SessionRecord>, StorageError> {
        let now = Utc::now();
        Ok(self
            .sessions
            .read()
            .ok()
            .and_then(|map| map.get(session_id).cloned())
            .filter(|session| !session.is_expired(now)))
    }

    async fn delete_session(&self, session_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .sessions
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(session_id).is_some())
    }
}
