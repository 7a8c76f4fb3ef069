use crate::core::errors::SplitError;
use crate::core::models::audit::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local audit trail shared by every clone.
#[derive(Clone, Default)]
pub struct InMemoryLogging {
    entries: Arc<RwLock<Vec<AppLog>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        session_id: Option<&str>,
    ) -> Result<(), SplitError> {
        let entry = AppLog::new(action, details, session_id);
        debug!("audit {} session={:?}", entry.action, entry.session_id);
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, SplitError> {
        Ok(self.entries.read().await.clone())
    }

    async fn get_session_logs(&self, session_id: &str) -> Result<Vec<AppLog>, SplitError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().filter(|e| e.belongs_to(session_id)).cloned().collect())
    }
}
