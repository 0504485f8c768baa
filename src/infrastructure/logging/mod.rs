pub mod in_memory;

use crate::core::errors::SettleError;
use crate::core::models::audit::AppLog;
use async_trait::async_trait;

/// Application-wide action log. Scope-bound actions are also audited in storage.
#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        scope_id: Option<&str>,
        details: serde_json::Value,
        member_id: Option<&str>,
    ) -> Result<(), SettleError>;
    /// Entries recorded for actions taken by `member_id`, oldest first.
    async fn get_logs_by_member(&self, member_id: &str) -> Result<Vec<AppLog>, SettleError>;
}
