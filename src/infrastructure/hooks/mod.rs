pub mod personal_ledger;

use crate::core::errors::SettleError;
use crate::core::models::{scope::Scope, settlement::SettlementRecord};
use async_trait::async_trait;

/// Notified after a new settlement record has been committed.
///
/// Never invoked for a record that was fetched rather than created.
#[async_trait]
pub trait SettlementHook: Send + Sync {
    async fn settlement_committed(&self, scope: &Scope, record: &SettlementRecord) -> Result<(), SettleError>;
}

/// Hook that does nothing, for embedding the service without side effects.
#[derive(Clone, Copy, Default)]
pub struct NoopHook;

#[async_trait]
impl SettlementHook for NoopHook {
    async fn settlement_committed(&self, _scope: &Scope, _record: &SettlementRecord) -> Result<(), SettleError> {
        Ok(())
    }
}
