use crate::core::errors::SettleError;
use crate::core::models::audit::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Keeps every entry plus a per-member index into it.
#[derive(Clone, Default)]
pub struct InMemoryLogging {
    logs: Arc<RwLock<Vec<AppLog>>>,
    by_member: Arc<RwLock<HashMap<String, Vec<usize>>>>,
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
        scope_id: Option<&str>,
        details: serde_json::Value,
        member_id: Option<&str>,
    ) -> Result<(), SettleError> {
        let details = serde_json::from_value(details)
            .map_err(|e| SettleError::LoggingError(format!("Log details for {} must be an object: {}", action, e)))?;

        let mut logs = self.logs.write().await;
        let mut by_member = self.by_member.write().await;
        if let Some(member_id) = member_id {
            by_member.entry(member_id.to_string()).or_default().push(logs.len());
        }
        logs.push(AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            scope_id: scope_id.map(String::from),
            member_id: member_id.map(String::from),
            details,
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn get_logs_by_member(&self, member_id: &str) -> Result<Vec<AppLog>, SettleError> {
        let logs = self.logs.read().await;
        let by_member = self.by_member.read().await;
        Ok(by_member
            .get(member_id)
            .map(|positions| positions.iter().map(|&pos| logs[pos].clone()).collect())
            .unwrap_or_default())
    }
}
