use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum SettleError {
    /// Group or event with given ID not found
    #[error("Scope {0} not found")]
    ScopeNotFound(String),

    /// Scope with given ID is already registered
    #[error("Scope {0} already exists")]
    ScopeAlreadyExists(String),

    /// Nothing to settle in the scope
    #[error("No expenses found for scope {0}")]
    NoExpenses(String),

    /// No settlement record exists for the scope
    #[error("Settlement for scope {0} not found")]
    SettlementNotFound(String),

    /// Transfer with given ID is not part of the scope's settlement
    #[error("Transfer {0} not found")]
    TransferNotFound(String),

    /// Only the receiving member may confirm a transfer
    #[error("Member {0} not authorized to mark this transfer as paid")]
    NotAuthorized(String),

    #[error("Member {0} is not a scope member")]
    NotScopeMember(String),

    #[error("Invalid split member: {0}")]
    InvalidSplitMember(String),

    #[error("Invalid split")]
    InvalidSplit,

    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    /// Missing, malformed or expired bearer token
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Settlement hook error: {0}")]
    HookError(String),
}

impl SettleError {
    pub fn invalid_input(field: &str, title: &str, description: impl Into<String>) -> Self {
        SettleError::InvalidInput(
            field.to_string(),
            FieldError {
                field: field.to_string(),
                title: title.to_string(),
                description: description.into(),
            },
        )
    }
}
