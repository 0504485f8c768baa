pub mod api;
pub mod auth;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::SettleError;
pub use crate::core::services::SettleService;
pub use crate::core::settlement::{Balances, compute_balances, reduce_to_transfers};
pub use crate::infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
