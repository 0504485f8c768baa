use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::SettleError;
use crate::core::models::scope::{Member, ScopeKind};
use crate::core::models::settlement::{SettlementRecord, Transfer};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateScopeRequest {
    pub id: Option<String>,
    pub kind: ScopeKind,
    pub name: String,
    pub parent_group_id: Option<String>,
    pub members: Vec<Member>,
}

#[derive(Deserialize, ToSchema)]
pub struct AddExpenseRequest {
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub split_between: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub settlements: Vec<Transfer>,
    pub settlement_ended: bool,
}

impl From<SettlementRecord> for SettlementResponse {
    fn from(record: SettlementRecord) -> Self {
        SettlementResponse {
            settlements: record.transfers,
            settlement_ended: record.all_settled,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidResponse {
    pub settlement: Transfer,
    pub settlement_ended: bool,
}

// Error response struct
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for SettleError to implement IntoResponse
pub struct ApiError(pub SettleError);

impl From<SettleError> for ApiError {
    fn from(err: SettleError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            SettleError::ScopeNotFound(_)
            | SettleError::SettlementNotFound(_)
            | SettleError::TransferNotFound(_)
            | SettleError::NoExpenses(_) => StatusCode::NOT_FOUND,
            SettleError::ScopeAlreadyExists(_) => StatusCode::CONFLICT,
            SettleError::NotAuthorized(_) | SettleError::NotScopeMember(_) => StatusCode::FORBIDDEN,
            SettleError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            SettleError::InvalidSplit | SettleError::InvalidSplitMember(_) | SettleError::InvalidInput(..) => {
                StatusCode::BAD_REQUEST
            }
            SettleError::InternalServerError(_)
            | SettleError::StorageError(_)
            | SettleError::LoggingError(_)
            | SettleError::HookError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self.0);
        }
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}
