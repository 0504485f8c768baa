use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Pending,
    Paid,
}

/// One directed payment instruction: `from` owes `to` the given amount.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Transfer {
    pub id: String,
    pub from: String,
    pub to: String,
    pub from_name: String,
    pub to_name: String,
    /// Whole minor currency units.
    pub amount: f64,
    pub status: TransferStatus,
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transfer {
    pub fn is_paid(&self) -> bool {
        self.status == TransferStatus::Paid
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SettlementRecord {
    pub id: String,
    pub scope_id: String,
    pub transfers: Vec<Transfer>,
    pub all_settled: bool,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl SettlementRecord {
    pub fn transfer_mut(&mut self, transfer_id: &str) -> Option<&mut Transfer> {
        self.transfers.iter_mut().find(|t| t.id == transfer_id)
    }

    /// Recomputes `all_settled` from the transfer statuses.
    pub fn refresh_settled(&mut self) {
        self.all_settled = self.transfers.iter().all(Transfer::is_paid);
    }
}
