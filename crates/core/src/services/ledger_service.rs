use chrono::{Datelike, NaiveDate};

use crate::errors::CoreError;
use crate::models::budget::{Budget, BudgetProgress};
use crate::models::category::{
    CustomCategory, DEFAULT_EXPENSE_CATEGORIES, DEFAULT_INCOME_CATEGORIES,
};
use crate::models::currency::Currency;
use crate::models::ledger::Ledger;
use crate::models::transaction::{Transaction, TransactionKind};

use super::currency_service::CurrencyService;

/// Manages the transaction log, budgets and categories.
///
/// Pure business logic: no I/O, no clock access. Easy to test.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Add a validated transaction to the log.
    pub fn add_transaction(
        &self,
        ledger: &mut Ledger,
        transaction: Transaction,
    ) -> Result<(), CoreError> {
        Self::validate_entry(transaction.amount, &transaction.category)?;
        ledger.transactions.push(transaction);
        Ok(())
    }

    /// Update an existing transaction in place. The id and the
    /// generated-from-recurring flag are preserved.
    #[allow(clippy::too_many_arguments)]
    pub fn update_transaction(
        &self,
        ledger: &mut Ledger,
        id: i64,
        date: NaiveDate,
        amount: f64,
        category: String,
        description: Option<String>,
        kind: TransactionKind,
    ) -> Result<(), CoreError> {
        Self::validate_entry(amount, &category)?;

        let transaction = ledger
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::TransactionNotFound(id))?;

        transaction.date = date;
        transaction.amount = amount;
        transaction.category = category;
        transaction.description = description;
        transaction.kind = kind;
        Ok(())
    }

    /// Remove a transaction by id.
    pub fn remove_transaction(&self, ledger: &mut Ledger, id: i64) -> Result<(), CoreError> {
        let idx = ledger
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(CoreError::TransactionNotFound(id))?;
        ledger.transactions.remove(idx);
        Ok(())
    }

    /// List transactions newest-first (ties broken by id, newest first),
    /// optionally restricted to one kind and/or a case-insensitive search
    /// over category and description.
    pub fn list_transactions<'a>(
        &self,
        ledger: &'a Ledger,
        kind: Option<TransactionKind>,
        query: &str,
    ) -> Vec<&'a Transaction> {
        let needle = query.trim().to_lowercase();
        let mut result: Vec<&Transaction> = ledger
            .transactions
            .iter()
            .filter(|t| kind.map_or(true, |k| t.kind == k))
            .filter(|t| {
                needle.is_empty()
                    || t.category.to_lowercase().contains(&needle)
                    || t.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect();
        result.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        result
    }

    /// Sum of all amounts of one kind.
    #[must_use]
    pub fn total(&self, ledger: &Ledger, kind: TransactionKind) -> f64 {
        ledger
            .transactions
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }

    // ── Budgets ─────────────────────────────────────────────────────

    /// Create or replace the budget for a category.
    pub fn set_budget(
        &self,
        ledger: &mut Ledger,
        category: String,
        limit: f64,
    ) -> Result<(), CoreError> {
        Self::validate_entry(limit, &category)?;
        ledger.budgets.retain(|b| b.category != category);
        ledger.budgets.push(Budget { category, limit });
        Ok(())
    }

    /// Remove the budget for a category. Returns whether one existed.
    pub fn remove_budget(&self, ledger: &mut Ledger, category: &str) -> bool {
        let before = ledger.budgets.len();
        ledger.budgets.retain(|b| b.category != category);
        ledger.budgets.len() != before
    }

    /// Progress of every budget against the expenses recorded in the
    /// month containing `today`.
    pub fn budget_progress(&self, ledger: &Ledger, today: NaiveDate) -> Vec<BudgetProgress> {
        ledger
            .budgets
            .iter()
            .map(|budget| {
                let spent = ledger
                    .transactions
                    .iter()
                    .filter(|t| {
                        t.kind == TransactionKind::Expense
                            && t.category == budget.category
                            && t.date.year() == today.year()
                            && t.date.month() == today.month()
                    })
                    .map(|t| t.amount)
                    .sum();
                BudgetProgress {
                    category: budget.category.clone(),
                    limit: budget.limit,
                    spent,
                }
            })
            .collect()
    }

    // ── Categories ──────────────────────────────────────────────────

    /// Add a custom category. The name must be non-empty after trimming.
    pub fn add_custom_category(
        &self,
        ledger: &mut Ledger,
        category: CustomCategory,
    ) -> Result<(), CoreError> {
        if category.name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Category name must not be empty".into(),
            ));
        }
        ledger.custom_categories.push(category);
        Ok(())
    }

    /// Remove a custom category by name. Returns whether one existed.
    pub fn remove_custom_category(&self, ledger: &mut Ledger, name: &str) -> bool {
        let before = ledger.custom_categories.len();
        ledger.custom_categories.retain(|c| c.name != name);
        ledger.custom_categories.len() != before
    }

    /// Selectable categories for one kind: the built-in defaults followed
    /// by the user's custom categories of that kind.
    pub fn categories_for(&self, ledger: &Ledger, kind: TransactionKind) -> Vec<String> {
        let defaults: &[&str] = match kind {
            TransactionKind::Expense => &DEFAULT_EXPENSE_CATEGORIES,
            TransactionKind::Income => &DEFAULT_INCOME_CATEGORIES,
        };
        defaults
            .iter()
            .map(|s| (*s).to_string())
            .chain(
                ledger
                    .custom_categories
                    .iter()
                    .filter(|c| c.kind == kind)
                    .map(|c| c.name.clone()),
            )
            .collect()
    }

    // ── Currency rewrite ────────────────────────────────────────────

    /// Rewrite every stored amount (transaction amounts, budget limits,
    /// recurring amounts) from one currency into another. Used by
    /// the explicit "convert my history" path on currency change; the
    /// relabel-only path never calls this.
    pub fn convert_amounts(
        &self,
        ledger: &mut Ledger,
        currency_service: &CurrencyService,
        from: Currency,
        to: Currency,
    ) {
        for transaction in &mut ledger.transactions {
            transaction.amount = currency_service.convert(transaction.amount, from, to);
        }
        for budget in &mut ledger.budgets {
            budget.limit = currency_service.convert(budget.limit, from, to);
        }
        for definition in &mut ledger.recurring {
            definition.amount = currency_service.convert(definition.amount, from, to);
        }
    }

    /// Shared entry validation: a positive finite amount and a non-empty
    /// label.
    pub fn validate_entry(amount: f64, category: &str) -> Result<(), CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationError(
                "Amount must be a positive number".into(),
            ));
        }
        if category.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Category must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
