
use crate::core::models::scope::{Member, Scope, ScopeKind};
use crate::core::services::{NewExpense, NewScope, SettleService};
use crate::infrastructure::hooks::personal_ledger::PersonalLedgerHook;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub type TestService = SettleService<InMemoryLogging, InMemoryStorage, PersonalLedgerHook<InMemoryStorage>>;

pub const TEST_SECRET: &str = "test-secret";

pub fn create_test_service() -> TestService {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let hook = PersonalLedgerHook::new(storage.clone());
    SettleService::new(storage, logging, hook, TEST_SECRET.to_string())
}

pub fn member(id: &str, name: &str) -> Member {
    Member {
        id: id.to_string(),
        name: name.to_string(),
    }
}

/// Group "trip" with members a (Alice), b (Bob), c (Carol).
pub async fn create_trip(service: &TestService) -> Scope {
    service
        .create_scope(
            NewScope {
                id: Some("trip".to_string()),
                kind: ScopeKind::Group,
                name: "Goa Trip".to_string(),
                parent_group_id: None,
                members: vec![member("a", "Alice"), member("b", "Bob"), member("c", "Carol")],
            },
            "a",
        )
        .await
        .unwrap()
}

pub fn new_expense(amount: f64, paid_by: &str, split_between: &[&str]) -> NewExpense {
    NewExpense {
        description: "Dinner".to_string(),
        amount,
        paid_by: paid_by.to_string(),
        split_between: split_between.iter().map(|s| s.to_string()).collect(),
    }
}
