use utoipa::OpenApi;

use crate::{
    api::models::{AddExpenseRequest, CreateScopeRequest, ErrorResponse, MarkPaidResponse, SettlementResponse},
    core::models::{
        audit::{AppLog, ScopeAudit},
        expense::Expense,
        personal_expense::PersonalExpense,
        scope::{Member, Scope, ScopeKind},
        settlement::{SettlementRecord, Transfer, TransferStatus},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_scope,
        super::handlers::add_expense,
        super::handlers::list_expenses,
        super::handlers::get_or_create_settlement,
        super::handlers::get_settlement,
        super::handlers::mark_transfer_paid,
        super::handlers::get_personal_expenses,
        super::handlers::get_scope_audits,
        super::handlers::get_app_logs
    ),
    components(schemas(
        CreateScopeRequest,
        AddExpenseRequest,
        SettlementResponse,
        MarkPaidResponse,
        ErrorResponse,
        Member,
        Scope,
        ScopeKind,
        Expense,
        Transfer,
        TransferStatus,
        SettlementRecord,
        PersonalExpense,
        AppLog,
        ScopeAudit
    )),
    info(
        title = "SettleUp API",
        description = "API for settling shared group and event expenses",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_settlement_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| *p == "/api/scopes/{scope_id}/settlements"));
        assert!(paths.iter().any(|p| *p == "/api/scopes/{scope_id}/settlements/{transfer_id}/paid"));
    }
}
