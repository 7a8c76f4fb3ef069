pub mod in_memory;

use crate::core::errors::SplitError;
use crate::core::models::audit::AppLog;
use async_trait::async_trait;

/// Audit trail of service actions, oldest first.
#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        session_id: Option<&str>,
    ) -> Result<(), SplitError>;
    async fn get_logs(&self) -> Result<Vec<AppLog>, SplitError>;
    async fn get_session_logs(&self, session_id: &str) -> Result<Vec<AppLog>, SplitError>;
}
