//! Net balance computation and greedy min-cash-flow reduction.
//!
//! Both functions are pure. The order of members in [`Balances`] is the order
//! in which they are first seen while scanning expenses, and that order alone
//! decides the exact transfer sequence.

use crate::core::models::expense::Expense;
use crate::core::models::settlement::{Transfer, TransferStatus};
use log::debug;
use std::collections::HashMap;
use uuid::Uuid;

/// Balances within this distance of zero count as settled.
pub const SETTLEMENT_EPSILON: f64 = 0.01;

/// Signed net balance per member, kept in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct Balances {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, member_id: &str) -> &mut f64 {
        let pos = match self.index.get(member_id) {
            Some(&pos) => pos,
            None => {
                self.entries.push((member_id.to_string(), 0.0));
                self.index.insert(member_id.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    pub fn get(&self, member_id: &str) -> Option<f64> {
        self.index.get(member_id).map(|&pos| self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(id, balance)| (id.as_str(), *balance))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances; zero (within epsilon) for any closed set of expenses.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, balance)| balance).sum()
    }

    /// Sum of the positive balances, i.e. the total owed to creditors.
    pub fn total_credit(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, balance)| *balance)
            .filter(|balance| *balance > SETTLEMENT_EPSILON)
            .sum()
    }
}

/// Computes each member's net balance over `expenses`.
///
/// Every splitter other than the payer is debited `amount / |split_between|`
/// and the payer is credited the same share. A payer who is also a splitter
/// contributes nothing for their own share.
pub fn compute_balances(expenses: &[Expense]) -> Balances {
    let mut balances = Balances::new();

    for expense in expenses {
        if expense.split_between.is_empty() {
            continue;
        }
        let share = expense.amount / expense.split_between.len() as f64;

        for member_id in &expense.split_between {
            balances.slot(member_id);
        }
        balances.slot(&expense.paid_by);

        for member_id in &expense.split_between {
            if *member_id == expense.paid_by {
                continue;
            }
            *balances.slot(member_id) -= share;
            *balances.slot(&expense.paid_by) += share;
        }
    }

    debug!(
        "computed balances for {} members over {} expenses (total {:.4})",
        balances.len(),
        expenses.len(),
        balances.total()
    );
    balances
}

/// Greedily pairs debtors with creditors until one side is exhausted.
///
/// Each step moves `min(|debtor|, creditor)` and emits a pending transfer
/// rounded to whole units. A step may exhaust both parties at once. A debt
/// smaller than half a unit is still owed, so it is carried as one unit.
/// `name_of` resolves a member id to the display name stored on the transfer.
pub fn reduce_to_transfers<F>(balances: &Balances, name_of: F) -> Vec<Transfer>
where
    F: Fn(&str) -> String,
{
    let mut debtors: Vec<(&str, f64)> = balances
        .iter()
        .filter(|(_, balance)| *balance < -SETTLEMENT_EPSILON)
        .collect();
    let mut creditors: Vec<(&str, f64)> = balances
        .iter()
        .filter(|(_, balance)| *balance > SETTLEMENT_EPSILON)
        .collect();

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let (debtor, owed) = debtors[i];
        let (creditor, credit) = creditors[j];
        let amount = (-owed).min(credit);

        transfers.push(Transfer {
            id: Uuid::new_v4().to_string(),
            from: debtor.to_string(),
            to: creditor.to_string(),
            from_name: name_of(debtor),
            to_name: name_of(creditor),
            amount: amount.round().max(1.0),
            status: TransferStatus::Pending,
            updated_at: None,
        });

        debtors[i].1 += amount;
        creditors[j].1 -= amount;

        if debtors[i].1.abs() < SETTLEMENT_EPSILON {
            i += 1;
        }
        if creditors[j].1.abs() < SETTLEMENT_EPSILON {
            j += 1;
        }
    }

    debug!(
        "reduced {} debtors and {} creditors to {} transfers",
        debtors.len(),
        creditors.len(),
        transfers.len()
    );
    transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn expense(amount: f64, paid_by: &str, split_between: &[&str]) -> Expense {
        Expense {
            id: Uuid::new_v4().to_string(),
            scope_id: "trip".to_string(),
            description: "shared".to_string(),
            amount,
            paid_by: paid_by.to_string(),
            split_between: split_between.iter().map(|s| s.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    fn plain_names(id: &str) -> String {
        id.to_string()
    }

    fn pairs(transfers: &[Transfer]) -> Vec<(&str, &str, f64)> {
        transfers
            .iter()
            .map(|t| (t.from.as_str(), t.to.as_str(), t.amount))
            .collect()
    }

    #[test]
    fn test_three_way_split_paid_by_one() {
        let _ = env_logger::try_init();
        let balances = compute_balances(&[expense(300.0, "A", &["A", "B", "C"])]);

        assert_eq!(balances.get("A"), Some(200.0));
        assert_eq!(balances.get("B"), Some(-100.0));
        assert_eq!(balances.get("C"), Some(-100.0));

        let transfers = reduce_to_transfers(&balances, plain_names);
        assert_eq!(pairs(&transfers), vec![("B", "A", 100.0), ("C", "A", 100.0)]);
        assert!(transfers.iter().all(|t| t.status == TransferStatus::Pending));
    }

    #[test]
    fn test_two_way_split_with_payer_as_splitter() {
        let balances = compute_balances(&[expense(100.0, "A", &["A", "B"])]);
        assert_eq!(balances.get("A"), Some(50.0));
        assert_eq!(balances.get("B"), Some(-50.0));

        let transfers = reduce_to_transfers(&balances, plain_names);
        assert_eq!(pairs(&transfers), vec![("B", "A", 50.0)]);
    }

    #[test]
    fn test_payer_outside_split_is_credited_full_amount() {
        let balances = compute_balances(&[expense(90.0, "P", &["X", "Y", "Z"])]);
        assert!((balances.get("P").unwrap() - 90.0).abs() < 1e-9);
        let order: Vec<&str> = balances.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["X", "Y", "Z", "P"]);
    }

    #[test]
    fn test_self_only_expense_is_neutral() {
        let balances = compute_balances(&[expense(40.0, "A", &["A"])]);
        assert_eq!(balances.get("A"), Some(0.0));
        assert!(reduce_to_transfers(&balances, plain_names).is_empty());
    }

    #[test]
    fn test_balances_sum_to_zero() {
        let expenses = vec![
            expense(100.0, "A", &["A", "B", "C"]),
            expense(57.35, "B", &["A", "C"]),
            expense(12.0, "C", &["A", "B", "C", "D"]),
            expense(999.99, "D", &["B", "D"]),
        ];
        let balances = compute_balances(&expenses);
        assert!(balances.total().abs() < SETTLEMENT_EPSILON);
    }

    #[test]
    fn test_first_seen_order_decides_transfer_sequence() {
        // C is seen before B, so C settles first.
        let expenses = vec![
            expense(60.0, "A", &["C", "A"]),
            expense(60.0, "A", &["B", "A"]),
        ];
        let transfers = reduce_to_transfers(&compute_balances(&expenses), plain_names);
        assert_eq!(pairs(&transfers), vec![("C", "A", 30.0), ("B", "A", 30.0)]);
    }

    #[test]
    fn test_single_step_can_exhaust_both_sides() {
        // A owes 50 to C, B owes 50 to D; pointers must both advance.
        let expenses = vec![expense(50.0, "C", &["A"]), expense(50.0, "D", &["B"])];
        let transfers = reduce_to_transfers(&compute_balances(&expenses), plain_names);
        assert_eq!(pairs(&transfers), vec![("A", "C", 50.0), ("B", "D", 50.0)]);
    }

    #[test]
    fn test_debtor_split_across_creditors() {
        let expenses = vec![
            expense(30.0, "A", &["C"]),
            expense(70.0, "B", &["C"]),
        ];
        let transfers = reduce_to_transfers(&compute_balances(&expenses), plain_names);
        assert_eq!(pairs(&transfers), vec![("C", "A", 30.0), ("C", "B", 70.0)]);
    }

    #[test]
    fn test_amounts_are_rounded_per_transfer() {
        let transfers =
            reduce_to_transfers(&compute_balances(&[expense(100.0, "A", &["A", "B", "C"])]), plain_names);
        assert_eq!(pairs(&transfers), vec![("B", "A", 33.0), ("C", "A", 33.0)]);
    }

    #[test]
    fn test_transfers_conserve_credit_and_never_self_transfer() {
        let expenses = vec![
            expense(120.0, "A", &["A", "B", "C", "D"]),
            expense(45.5, "B", &["C", "D"]),
            expense(300.0, "C", &["A", "B", "C"]),
            expense(17.25, "D", &["A", "D"]),
            expense(88.0, "E", &["A", "E", "B"]),
        ];
        let balances = compute_balances(&expenses);
        let transfers = reduce_to_transfers(&balances, plain_names);

        assert!(transfers.iter().all(|t| t.from != t.to));
        assert!(transfers.iter().all(|t| t.amount > 0.0 && t.amount.fract() == 0.0));

        let moved: f64 = transfers.iter().map(|t| t.amount).sum();
        let tolerance = transfers.len() as f64;
        assert!((moved - balances.total_credit()).abs() <= tolerance);
    }

    #[test]
    fn test_names_are_resolved_through_callback() {
        let balances = compute_balances(&[expense(20.0, "u1", &["u1", "u2"])]);
        let transfers = reduce_to_transfers(&balances, |id| match id {
            "u1" => "Alice".to_string(),
            _ => "Bob".to_string(),
        });
        assert_eq!(transfers[0].from_name, "Bob");
        assert_eq!(transfers[0].to_name, "Alice");
    }

    #[test]
    fn test_small_debts_still_produce_transfers() {
        // Five members owe 0.4 each and one owes 10, all to A.
        let mut expenses: Vec<Expense> = ["B", "C", "D", "E", "F"]
            .iter()
            .map(|m| expense(0.4, "A", &[*m]))
            .collect();
        expenses.push(expense(10.0, "A", &["G"]));
        let balances = compute_balances(&expenses);
        let transfers = reduce_to_transfers(&balances, plain_names);

        assert_eq!(transfers.len(), 6);
        assert!(transfers.iter().all(|t| t.to == "A" && t.amount >= 1.0));
        assert_eq!(transfers[5].amount, 10.0);

        let moved: f64 = transfers.iter().map(|t| t.amount).sum();
        assert!((moved - balances.total_credit()).abs() <= transfers.len() as f64);
    }

    #[test]
    fn test_sub_epsilon_balances_are_ignored() {
        let balances = compute_balances(&[expense(0.01, "A", &["A", "B"])]);
        assert!(reduce_to_transfers(&balances, plain_names).is_empty());
    }
}
