use crate::auth::jwt::{Claims, JwtService};
use crate::constants::constants::{
    EXPENSE_ADDED, EXPENSES_QUERIED, MAX_AMOUNT, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, SCOPE_CREATED,
    SETTLEMENT_CLOSED, SETTLEMENT_COMPUTED, SETTLEMENT_FETCHED, TRANSFER_MARKED_PAID,
};
use crate::core::errors::SettleError;
use crate::core::models::{
    audit::{AppLog, ScopeAudit},
    expense::Expense,
    personal_expense::PersonalExpense,
    scope::{Member, Scope, ScopeKind},
    settlement::{SettlementRecord, TransferStatus},
};
use crate::core::settlement::{compute_balances, reduce_to_transfers};
use crate::infrastructure::hooks::SettlementHook;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use serde_json::json;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Input for [`SettleService::create_scope`].
#[derive(Debug, Clone)]
pub struct NewScope {
    /// Caller-chosen id; a UUID is generated when absent.
    pub id: Option<String>,
    pub kind: ScopeKind,
    pub name: String,
    pub parent_group_id: Option<String>,
    pub members: Vec<Member>,
}

/// Input for [`SettleService::add_expense`].
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub split_between: Vec<String>,
}

pub struct SettleService<L: LoggingService, S: Storage, H: SettlementHook> {
    storage: S,
    logging: L,
    hook: H,
    jwt_service: JwtService,
}

impl<L: LoggingService, S: Storage, H: SettlementHook> SettleService<L, S, H> {
    pub fn new(storage: S, logging: L, hook: H, jwt_secret: String) -> Self {
        SettleService {
            storage,
            logging,
            hook,
            jwt_service: JwtService::new(jwt_secret),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, SettleError> {
        self.jwt_service.validate_token(token)
    }

    pub fn issue_token(&self, member_id: &str, ttl_secs: u64) -> Result<String, SettleError> {
        self.jwt_service.generate_token(member_id, ttl_secs)
    }

    async fn load_scope(&self, scope_id: &str) -> Result<Scope, SettleError> {
        self.storage
            .get_scope(scope_id)
            .await?
            .ok_or_else(|| SettleError::ScopeNotFound(scope_id.to_string()))
    }

    async fn validate_scope_membership(&self, scope_id: &str, member_id: &str) -> Result<Scope, SettleError> {
        let scope = self.load_scope(scope_id).await?;
        if !scope.is_member(member_id) {
            warn!("Member {} is not part of scope {}", member_id, scope_id);
            return Err(SettleError::NotScopeMember(member_id.to_string()));
        }
        Ok(scope)
    }

    async fn log_and_audit(
        &self,
        scope_id: Option<&str>,
        action: &str,
        log_details: serde_json::Value,
        member_id: Option<&str>,
    ) -> Result<(), SettleError> {
        self.logging
            .log_action(action, scope_id, log_details.clone(), member_id)
            .await?;
        if let Some(sid) = scope_id {
            self.storage
                .save_scope_audit(ScopeAudit {
                    id: Uuid::new_v4().to_string(),
                    scope_id: sid.to_string(),
                    action: action.to_string(),
                    member_id: member_id.map(String::from),
                    details: serde_json::from_value(log_details).unwrap_or_default(),
                    timestamp: Utc::now(),
                })
                .await?;
        }
        Ok(())
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), SettleError> {
        if value.trim().is_empty() {
            return Err(SettleError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if value.len() > max_length {
            return Err(SettleError::invalid_input(
                field,
                &format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(SettleError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<(), SettleError> {
        if !amount.is_finite() {
            return Err(SettleError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be a finite number",
            ));
        }
        if amount <= 0.0 {
            return Err(SettleError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be greater than 0",
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(SettleError::invalid_input(
                field,
                "Amount Too Large",
                format!("Amount cannot exceed {}", MAX_AMOUNT),
            ));
        }
        Ok(())
    }

    pub async fn create_scope(&self, new_scope: NewScope, created_by: &str) -> Result<Scope, SettleError> {
        self.validate_string_input("name", &new_scope.name, MAX_NAME_LENGTH)?;
        if new_scope.members.is_empty() {
            return Err(SettleError::invalid_input(
                "members",
                "Invalid members",
                "members cannot be empty",
            ));
        }

        {
            let mut seen = HashSet::new();
            for member in &new_scope.members {
                self.validate_string_input("member_id", &member.id, MAX_NAME_LENGTH)?;
                self.validate_string_input("member_name", &member.name, MAX_NAME_LENGTH)?;
                if !seen.insert(member.id.as_str()) {
                    return Err(SettleError::invalid_input(
                        "members",
                        "Duplicate member",
                        format!("member {} is listed more than once", member.id),
                    ));
                }
            }
            if !seen.contains(created_by) {
                return Err(SettleError::NotScopeMember(created_by.to_string()));
            }
        }

        match (new_scope.kind, new_scope.parent_group_id.as_deref()) {
            (ScopeKind::Group, Some(_)) => {
                return Err(SettleError::invalid_input(
                    "parent_group_id",
                    "Invalid parent",
                    "groups cannot have a parent group",
                ));
            }
            (ScopeKind::Event, None) => {
                return Err(SettleError::invalid_input(
                    "parent_group_id",
                    "Missing parent",
                    "events must belong to a group",
                ));
            }
            (ScopeKind::Event, Some(parent_id)) => {
                let parent = self.load_scope(parent_id).await?;
                if parent.kind != ScopeKind::Group {
                    return Err(SettleError::invalid_input(
                        "parent_group_id",
                        "Invalid parent",
                        format!("{} is not a group", parent_id),
                    ));
                }
                if let Some(outsider) = new_scope.members.iter().find(|m| !parent.is_member(&m.id)) {
                    return Err(SettleError::NotScopeMember(outsider.id.clone()));
                }
            }
            (ScopeKind::Group, None) => {}
        }

        let scope = Scope {
            id: new_scope.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            kind: new_scope.kind,
            name: new_scope.name,
            parent_group_id: new_scope.parent_group_id,
            members: new_scope.members,
            created_at: Utc::now(),
        };

        if !self.storage.create_scope_if_not_exists(scope.clone()).await? {
            return Err(SettleError::ScopeAlreadyExists(scope.id));
        }
        info!("Created {} scope {} with {} members", scope.kind, scope.id, scope.members.len());

        self.log_and_audit(
            Some(&scope.id),
            SCOPE_CREATED,
            json!({
                "scope_id": scope.id,
                "kind": scope.kind.to_string(),
                "name": scope.name,
                "member_ids": scope.members.iter().map(|m| m.id.clone()).collect::<Vec<_>>()
            }),
            Some(created_by),
        )
        .await?;

        Ok(scope)
    }

    pub async fn add_expense(
        &self,
        scope_id: &str,
        new_expense: NewExpense,
        created_by: &str,
    ) -> Result<Expense, SettleError> {
        let scope = self.validate_scope_membership(scope_id, created_by).await?;

        self.validate_string_input("description", &new_expense.description, MAX_DESCRIPTION_LENGTH)?;
        self.validate_amount_input("amount", new_expense.amount)?;

        if !scope.is_member(&new_expense.paid_by) {
            return Err(SettleError::NotScopeMember(new_expense.paid_by));
        }
        if new_expense.split_between.is_empty() {
            return Err(SettleError::InvalidSplit);
        }
        {
            let mut seen = HashSet::new();
            for member_id in &new_expense.split_between {
                if !scope.is_member(member_id) {
                    return Err(SettleError::InvalidSplitMember(member_id.clone()));
                }
                if !seen.insert(member_id.as_str()) {
                    return Err(SettleError::InvalidSplit);
                }
            }
        }

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            scope_id: scope_id.to_string(),
            description: new_expense.description,
            amount: new_expense.amount,
            paid_by: new_expense.paid_by,
            split_between: new_expense.split_between,
            created_at: Utc::now(),
        };
        self.storage.save_expense(expense.clone()).await?;
        debug!("Expense {} saved in scope {}", expense.id, scope_id);

        self.log_and_audit(
            Some(scope_id),
            EXPENSE_ADDED,
            json!({
                "expense_id": expense.id,
                "scope_id": scope_id,
                "description": expense.description,
                "amount": expense.amount,
                "paid_by": expense.paid_by
            }),
            Some(created_by),
        )
        .await?;

        Ok(expense)
    }

    /// Expenses of the scope, newest first.
    pub async fn list_expenses(&self, scope_id: &str, queried_by: &str) -> Result<Vec<Expense>, SettleError> {
        self.validate_scope_membership(scope_id, queried_by).await?;
        let mut expenses = self.storage.get_expenses_by_scope(scope_id).await?;
        expenses.reverse();
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        self.log_and_audit(
            Some(scope_id),
            EXPENSES_QUERIED,
            json!({ "scope_id": scope_id, "count": expenses.len() }),
            Some(queried_by),
        )
        .await?;
        Ok(expenses)
    }

    /// Returns the scope's settlement, computing and persisting it on first request.
    ///
    /// Once a record exists it is returned as stored, even if expenses were
    /// added afterwards. When two callers race, storage keeps the first record
    /// and only its writer fires the settlement hook.
    pub async fn get_or_create_settlement(
        &self,
        scope_id: &str,
        requested_by: &str,
    ) -> Result<SettlementRecord, SettleError> {
        let scope = self.validate_scope_membership(scope_id, requested_by).await?;

        if let Some(existing) = self.storage.get_settlement(scope_id).await? {
            debug!("Settlement {} already exists for scope {}", existing.id, scope_id);
            self.log_and_audit(
                Some(scope_id),
                SETTLEMENT_FETCHED,
                json!({ "scope_id": scope_id, "settlement_id": existing.id }),
                Some(requested_by),
            )
            .await?;
            return Ok(existing);
        }

        let expenses = self.storage.get_expenses_by_scope(scope_id).await?;
        if expenses.is_empty() {
            return Err(SettleError::NoExpenses(scope_id.to_string()));
        }

        let balances = compute_balances(&expenses);
        let transfers = reduce_to_transfers(&balances, |member_id| scope.member_name(member_id));

        // Opens as unsettled; only marking the last transfer paid closes it.
        let record = SettlementRecord {
            id: Uuid::new_v4().to_string(),
            scope_id: scope_id.to_string(),
            transfers,
            all_settled: false,
            created_at: Utc::now(),
        };

        let stored = self.storage.insert_settlement_if_absent(record.clone()).await?;
        if stored.id != record.id {
            info!(
                "Settlement for scope {} was committed concurrently; returning record {}",
                scope_id, stored.id
            );
            return Ok(stored);
        }

        // Record is committed; hook failures are logged, not returned.
        if let Err(e) = self.hook.settlement_committed(&scope, &stored).await {
            warn!("Settlement hook failed for record {} in scope {}: {}", stored.id, scope_id, e);
        }
        info!(
            "Computed settlement {} for scope {} with {} transfers",
            stored.id,
            scope_id,
            stored.transfers.len()
        );

        self.log_and_audit(
            Some(scope_id),
            SETTLEMENT_COMPUTED,
            json!({
                "scope_id": scope_id,
                "settlement_id": stored.id,
                "expense_count": expenses.len(),
                "transfer_count": stored.transfers.len()
            }),
            Some(requested_by),
        )
        .await?;

        Ok(stored)
    }

    pub async fn get_settlement(&self, scope_id: &str, queried_by: &str) -> Result<SettlementRecord, SettleError> {
        self.validate_scope_membership(scope_id, queried_by).await?;
        let record = self
            .storage
            .get_settlement(scope_id)
            .await?
            .ok_or_else(|| SettleError::SettlementNotFound(scope_id.to_string()))?;

        self.log_and_audit(
            Some(scope_id),
            SETTLEMENT_FETCHED,
            json!({ "scope_id": scope_id, "settlement_id": record.id }),
            Some(queried_by),
        )
        .await?;
        Ok(record)
    }

    /// Marks a transfer paid on behalf of its receiving member.
    ///
    /// `Pending -> Paid` is terminal, so repeating the call on a paid transfer
    /// returns the record untouched.
    pub async fn mark_transfer_paid(
        &self,
        scope_id: &str,
        transfer_id: &str,
        acting_member: &str,
    ) -> Result<SettlementRecord, SettleError> {
        self.load_scope(scope_id).await?;
        let mut record = self
            .storage
            .get_settlement(scope_id)
            .await?
            .ok_or_else(|| SettleError::SettlementNotFound(scope_id.to_string()))?;

        let was_settled = record.all_settled;
        let transfer = record
            .transfer_mut(transfer_id)
            .ok_or_else(|| SettleError::TransferNotFound(transfer_id.to_string()))?;

        if transfer.to != acting_member {
            warn!(
                "Member {} attempted to confirm transfer {} owed to {}",
                acting_member, transfer_id, transfer.to
            );
            return Err(SettleError::NotAuthorized(acting_member.to_string()));
        }
        if transfer.is_paid() {
            debug!("Transfer {} already paid", transfer_id);
            return Ok(record);
        }

        transfer.status = TransferStatus::Paid;
        transfer.updated_at = Some(Utc::now());
        record.refresh_settled();
        self.storage.update_settlement(record.clone()).await?;

        self.log_and_audit(
            Some(scope_id),
            TRANSFER_MARKED_PAID,
            json!({ "scope_id": scope_id, "settlement_id": record.id, "transfer_id": transfer_id }),
            Some(acting_member),
        )
        .await?;

        if record.all_settled && !was_settled {
            info!("Settlement {} for scope {} is fully paid", record.id, scope_id);
            self.log_and_audit(
                Some(scope_id),
                SETTLEMENT_CLOSED,
                json!({ "scope_id": scope_id, "settlement_id": record.id }),
                Some(acting_member),
            )
            .await?;
        }

        Ok(record)
    }

    /// Personal ledger entries of a member, newest first.
    pub async fn get_personal_expenses(&self, member_id: &str) -> Result<Vec<PersonalExpense>, SettleError> {
        let mut expenses = self.storage.get_personal_expenses(member_id).await?;
        expenses.reverse();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    pub async fn get_scope_audits(&self, scope_id: &str, queried_by: &str) -> Result<Vec<ScopeAudit>, SettleError> {
        self.validate_scope_membership(scope_id, queried_by).await?;
        self.storage.get_scope_audits(scope_id).await
    }

    /// Application log entries for actions taken by `member_id`.
    pub async fn get_app_logs(&self, member_id: &str) -> Result<Vec<AppLog>, SettleError> {
        self.logging.get_logs_by_member(member_id).await
    }
}
