use crate::core::errors::SettleError;
use crate::core::models::personal_expense::{PersonalExpense, SETTLEMENT_CATEGORY};
use crate::core::models::{scope::Scope, settlement::SettlementRecord};
use crate::infrastructure::hooks::SettlementHook;
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

/// Books every transfer as a personal "Settlement" expense of the paying member.
pub struct PersonalLedgerHook<S: Storage> {
    storage: S,
}

impl<S: Storage> PersonalLedgerHook<S> {
    pub fn new(storage: S) -> Self {
        PersonalLedgerHook { storage }
    }
}

#[async_trait]
impl<S: Storage> SettlementHook for PersonalLedgerHook<S> {
    async fn settlement_committed(&self, scope: &Scope, record: &SettlementRecord) -> Result<(), SettleError> {
        let date = Utc::now();
        for transfer in &record.transfers {
            self.storage
                .save_personal_expense(PersonalExpense {
                    id: Uuid::new_v4().to_string(),
                    member_id: transfer.from.clone(),
                    amount: transfer.amount,
                    category: SETTLEMENT_CATEGORY.to_string(),
                    description: format!("You paid ₹{} to {}", transfer.amount, transfer.to_name),
                    payment_mode: "Other".to_string(),
                    date,
                })
                .await
                .map_err(|e| SettleError::HookError(format!("Failed to book transfer {}: {}", transfer.id, e)))?;
        }
        debug!(
            "booked {} settlement expenses for scope {}",
            record.transfers.len(),
            scope.id
        );
        Ok(())
    }
}
