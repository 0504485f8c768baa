use crate::{
    api::models::*,
    auth::jwt::Claims,
    core::{
        errors::SettleError,
        models::{
            audit::{AppLog, ScopeAudit},
            expense::Expense,
            personal_expense::PersonalExpense,
            scope::Scope,
        },
        services::{NewExpense, NewScope, SettleService},
    },
    infrastructure::{
        hooks::personal_ledger::PersonalLedgerHook, logging::in_memory::InMemoryLogging,
        storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Extension, Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, patch, post},
};
use http::header;

use std::sync::Arc;

pub type AppService = SettleService<InMemoryLogging, InMemoryStorage, PersonalLedgerHook<InMemoryStorage>>;

/// Builds the service wired to shared in-memory storage.
pub fn in_memory_service(jwt_secret: String) -> AppService {
    let storage = InMemoryStorage::new();
    let hook = PersonalLedgerHook::new(storage.clone());
    SettleService::new(storage, InMemoryLogging::new(), hook, jwt_secret)
}

// Middleware to validate JWT
async fn auth_middleware(
    State(service): State<Arc<AppService>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| SettleError::Unauthenticated("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| SettleError::Unauthenticated("Invalid Authorization header".to_string()))?;

    let claims = service.validate_token(token)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/scopes", post(create_scope))
        .route("/scopes/{scope_id}/expenses", post(add_expense).get(list_expenses))
        .route(
            "/scopes/{scope_id}/settlements",
            post(get_or_create_settlement).get(get_settlement),
        )
        .route(
            "/scopes/{scope_id}/settlements/{transfer_id}/paid",
            patch(mark_transfer_paid),
        )
        .route("/scopes/{scope_id}/audits", get(get_scope_audits))
        .route("/members/me/expenses", get(get_personal_expenses))
        .route("/logs", get(get_app_logs))
        .route_layer(middleware::from_fn_with_state(service.clone(), auth_middleware))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/scopes",
    request_body = CreateScopeRequest,
    responses(
        (status = 201, description = "Scope created successfully", body = Scope),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Creator is not a member", body = ErrorResponse),
        (status = 404, description = "Parent group not found", body = ErrorResponse),
        (status = 409, description = "Scope already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn create_scope(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateScopeRequest>,
) -> Result<(StatusCode, Json<Scope>), ApiError> {
    let scope = service
        .create_scope(
            NewScope {
                id: req.id,
                kind: req.kind,
                name: req.name,
                parent_group_id: req.parent_group_id,
                members: req.members,
            },
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(scope)))
}

#[utoipa::path(
    post,
    path = "/api/scopes/{scope_id}/expenses",
    request_body = AddExpenseRequest,
    params(
        ("scope_id" = String, Path, description = "ID of the group or event")
    ),
    responses(
        (status = 201, description = "Expense added successfully", body = Expense),
        (status = 400, description = "Invalid expense", body = ErrorResponse),
        (status = 403, description = "Not a scope member", body = ErrorResponse),
        (status = 404, description = "Scope not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn add_expense(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(scope_id): Path<String>,
    Json(req): Json<AddExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let expense = service
        .add_expense(
            &scope_id,
            NewExpense {
                description: req.description,
                amount: req.amount,
                paid_by: req.paid_by,
                split_between: req.split_between,
            },
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/scopes/{scope_id}/expenses",
    params(
        ("scope_id" = String, Path, description = "ID of the group or event")
    ),
    responses(
        (status = 200, description = "Expenses, newest first", body = Vec<Expense>),
        (status = 403, description = "Not a scope member", body = ErrorResponse),
        (status = 404, description = "Scope not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn list_expenses(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(scope_id): Path<String>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = service.list_expenses(&scope_id, &claims.sub).await?;
    Ok(Json(expenses))
}

#[utoipa::path(
    post,
    path = "/api/scopes/{scope_id}/settlements",
    params(
        ("scope_id" = String, Path, description = "ID of the group or event")
    ),
    responses(
        (status = 200, description = "Settlement computed or already present", body = SettlementResponse),
        (status = 403, description = "Not a scope member", body = ErrorResponse),
        (status = 404, description = "Scope not found or no expenses to settle", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_or_create_settlement(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(scope_id): Path<String>,
) -> Result<Json<SettlementResponse>, ApiError> {
    let record = service.get_or_create_settlement(&scope_id, &claims.sub).await?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    get,
    path = "/api/scopes/{scope_id}/settlements",
    params(
        ("scope_id" = String, Path, description = "ID of the group or event")
    ),
    responses(
        (status = 200, description = "Stored settlement", body = SettlementResponse),
        (status = 403, description = "Not a scope member", body = ErrorResponse),
        (status = 404, description = "Scope or settlement not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_settlement(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(scope_id): Path<String>,
) -> Result<Json<SettlementResponse>, ApiError> {
    let record = service.get_settlement(&scope_id, &claims.sub).await?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    patch,
    path = "/api/scopes/{scope_id}/settlements/{transfer_id}/paid",
    params(
        ("scope_id" = String, Path, description = "ID of the group or event"),
        ("transfer_id" = String, Path, description = "ID of the transfer to confirm")
    ),
    responses(
        (status = 200, description = "Transfer marked as paid", body = MarkPaidResponse),
        (status = 403, description = "Only the receiving member may confirm", body = ErrorResponse),
        (status = 404, description = "Scope, settlement or transfer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn mark_transfer_paid(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path((scope_id, transfer_id)): Path<(String, String)>,
) -> Result<Json<MarkPaidResponse>, ApiError> {
    let record = service
        .mark_transfer_paid(&scope_id, &transfer_id, &claims.sub)
        .await?;
    let settlement = record
        .transfers
        .iter()
        .find(|t| t.id == transfer_id)
        .cloned()
        .ok_or_else(|| SettleError::TransferNotFound(transfer_id.clone()))?;
    Ok(Json(MarkPaidResponse {
        settlement,
        settlement_ended: record.all_settled,
    }))
}

#[utoipa::path(
    get,
    path = "/api/members/me/expenses",
    responses(
        (status = 200, description = "Personal ledger of the caller, newest first", body = Vec<PersonalExpense>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_personal_expenses(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<PersonalExpense>>, ApiError> {
    let expenses = service.get_personal_expenses(&claims.sub).await?;
    Ok(Json(expenses))
}

#[utoipa::path(
    get,
    path = "/api/scopes/{scope_id}/audits",
    params(
        ("scope_id" = String, Path, description = "ID of the group or event")
    ),
    responses(
        (status = 200, description = "Scope audits retrieved successfully", body = Vec<ScopeAudit>),
        (status = 403, description = "Not a scope member", body = ErrorResponse),
        (status = 404, description = "Scope not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_scope_audits(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(scope_id): Path<String>,
) -> Result<Json<Vec<ScopeAudit>>, ApiError> {
    let audits = service.get_scope_audits(&scope_id, &claims.sub).await?;
    Ok(Json(audits))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Log entries for the caller's own actions", body = Vec<AppLog>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_app_logs(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs(&claims.sub).await?;
    Ok(Json(logs))
}
