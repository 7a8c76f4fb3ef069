use crate::core::errors::SplitError;
use crate::core::models::ApiCredentials;
use crate::core::recorder::AudioRecorder;
use crate::core::session::SessionState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Everything kept for one editing session.
#[derive(Clone, Debug)]
pub struct SessionRecord {
    pub id: String,
    pub credentials: ApiCredentials,
    pub state: SessionState,
    pub recorder: AudioRecorder,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save_session(&self, record: SessionRecord) -> Result<(), SplitError>;
    async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>, SplitError>;
    async fn delete_session(&self, session_id: &str) -> Result<bool, SplitError>;
    async fn session_count(&self) -> Result<usize, SplitError>;
}

pub mod in_memory;
