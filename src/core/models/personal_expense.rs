use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const SETTLEMENT_CATEGORY: &str = "Settlement";

/// An entry in a member's own expense ledger.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PersonalExpense {
    pub id: String,
    pub member_id: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub payment_mode: String,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub date: DateTime<Utc>,
}
