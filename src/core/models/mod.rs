pub mod audit;
pub mod expense;
pub mod personal_expense;
pub mod scope;
pub mod settlement;
