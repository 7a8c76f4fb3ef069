use crate::core::errors::SplitError;
use crate::infrastructure::storage::{SessionRecord, SessionStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        InMemorySessionStore {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save_session(&self, record: SessionRecord) -> Result<(), SplitError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>, SplitError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn delete_session(&self, session_id: &str) -> Result<bool, SplitError> {
        Ok(self.sessions.write().await.remove(session_id).is_some())
    }

    async fn session_count(&self) -> Result<usize, SplitError> {
        Ok(self.sessions.read().await.len())
    }
}
