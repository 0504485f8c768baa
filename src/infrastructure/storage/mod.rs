use crate::core::errors::SettleError;
use crate::core::models::{
    audit::ScopeAudit, expense::Expense, personal_expense::PersonalExpense, scope::Scope,
    settlement::SettlementRecord,
};
use async_trait::async_trait;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_scope_if_not_exists(&self, scope: Scope) -> Result<bool, SettleError>;
    async fn get_scope(&self, scope_id: &str) -> Result<Option<Scope>, SettleError>;
    async fn save_expense(&self, expense: Expense) -> Result<(), SettleError>;
    /// Expenses of the scope in insertion order.
    async fn get_expenses_by_scope(&self, scope_id: &str) -> Result<Vec<Expense>, SettleError>;
    /// Inserts `record` unless the scope already has one; returns the stored record.
    async fn insert_settlement_if_absent(&self, record: SettlementRecord) -> Result<SettlementRecord, SettleError>;
    async fn get_settlement(&self, scope_id: &str) -> Result<Option<SettlementRecord>, SettleError>;
    async fn update_settlement(&self, record: SettlementRecord) -> Result<(), SettleError>;
    async fn save_personal_expense(&self, expense: PersonalExpense) -> Result<(), SettleError>;
    async fn get_personal_expenses(&self, member_id: &str) -> Result<Vec<PersonalExpense>, SettleError>;
    async fn save_scope_audit(&self, audit: ScopeAudit) -> Result<(), SettleError>;
    async fn get_scope_audits(&self, scope_id: &str) -> Result<Vec<ScopeAudit>, SettleError>;
}

pub mod in_memory;
