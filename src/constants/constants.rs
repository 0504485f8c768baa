pub const SCOPE_CREATED: &str = "SCOPE_CREATED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const EXPENSES_QUERIED: &str = "EXPENSES_QUERIED";
pub const SETTLEMENT_COMPUTED: &str = "SETTLEMENT_COMPUTED";
pub const SETTLEMENT_FETCHED: &str = "SETTLEMENT_FETCHED";
pub const TRANSFER_MARKED_PAID: &str = "TRANSFER_MARKED_PAID";
pub const SETTLEMENT_CLOSED: &str = "SETTLEMENT_CLOSED";

pub const MAX_AMOUNT: f64 = 1_000_000.0;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
