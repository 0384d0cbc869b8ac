use super::budget::Budget;
use super::category::CustomCategory;
use super::recurring::RecurringDefinition;
use super::transaction::Transaction;

/// The in-memory application state: transaction log, budgets, recurring
/// definitions and custom categories.
///
/// Exactly one `Ledger` exists per tracker instance and all mutation
/// funnels through `ExpenseTracker` / `LedgerService`. Collections are
/// persisted individually under their own storage keys, so the ledger
/// itself is never serialized as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    /// All recorded transactions, in insertion order
    pub transactions: Vec<Transaction>,

    /// At most one budget per category
    pub budgets: Vec<Budget>,

    /// Recurring transaction templates
    pub recurring: Vec<RecurringDefinition>,

    /// User-defined categories on top of the built-in lists
    pub custom_categories: Vec<CustomCategory>,
}
