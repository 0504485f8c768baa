use crate::core::errors::SettleError;
use crate::core::models::{
    audit::ScopeAudit, expense::Expense, personal_expense::PersonalExpense, scope::Scope,
    settlement::SettlementRecord,
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    scopes: Arc<RwLock<HashMap<String, Scope>>>,
    expenses: Arc<RwLock<HashMap<String, Vec<Expense>>>>, // scope_id -> expenses in insertion order
    settlements: Arc<RwLock<HashMap<String, SettlementRecord>>>, // scope_id -> record
    personal_expenses: Arc<RwLock<HashMap<String, Vec<PersonalExpense>>>>,
    scope_audits: Arc<RwLock<HashMap<String, Vec<ScopeAudit>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_scope_if_not_exists(&self, scope: Scope) -> Result<bool, SettleError> {
        let mut scopes = self.scopes.write().await;
        match scopes.entry(scope.id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(scope);
                Ok(true)
            }
        }
    }

    async fn get_scope(&self, scope_id: &str) -> Result<Option<Scope>, SettleError> {
        Ok(self.scopes.read().await.get(scope_id).cloned())
    }

    async fn save_expense(&self, expense: Expense) -> Result<(), SettleError> {
        self.expenses
            .write()
            .await
            .entry(expense.scope_id.clone())
            .or_default()
            .push(expense);
        Ok(())
    }

    async fn get_expenses_by_scope(&self, scope_id: &str) -> Result<Vec<Expense>, SettleError> {
        Ok(self
            .expenses
            .read()
            .await
            .get(scope_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_settlement_if_absent(&self, record: SettlementRecord) -> Result<SettlementRecord, SettleError> {
        // Single write lock for check-and-insert keeps one record per scope.
        let mut settlements = self.settlements.write().await;
        Ok(settlements
            .entry(record.scope_id.clone())
            .or_insert(record)
            .clone())
    }

    async fn get_settlement(&self, scope_id: &str) -> Result<Option<SettlementRecord>, SettleError> {
        Ok(self.settlements.read().await.get(scope_id).cloned())
    }

    async fn update_settlement(&self, record: SettlementRecord) -> Result<(), SettleError> {
        let mut settlements = self.settlements.write().await;
        match settlements.get_mut(&record.scope_id) {
            Some(existing) if existing.id == record.id => {
                *existing = record;
                Ok(())
            }
            Some(_) => Err(SettleError::StorageError(format!(
                "Settlement {} is not the record stored for scope {}",
                record.id, record.scope_id
            ))),
            None => Err(SettleError::SettlementNotFound(record.scope_id)),
        }
    }

    async fn save_personal_expense(&self, expense: PersonalExpense) -> Result<(), SettleError> {
        self.personal_expenses
            .write()
            .await
            .entry(expense.member_id.clone())
            .or_default()
            .push(expense);
        Ok(())
    }

    async fn get_personal_expenses(&self, member_id: &str) -> Result<Vec<PersonalExpense>, SettleError> {
        Ok(self
            .personal_expenses
            .read()
            .await
            .get(member_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_scope_audit(&self, audit: ScopeAudit) -> Result<(), SettleError> {
        self.scope_audits
            .write()
            .await
            .entry(audit.scope_id.clone())
            .or_default()
            .push(audit);
        Ok(())
    }

    async fn get_scope_audits(&self, scope_id: &str) -> Result<Vec<ScopeAudit>, SettleError> {
        // For production: Add pagination
        Ok(self
            .scope_audits
            .read()
            .await
            .get(scope_id)
            .cloned()
            .unwrap_or_default())
    }
}
