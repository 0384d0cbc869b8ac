pub mod errors;
pub mod models;
pub mod reminders;
pub mod services;
pub mod storage;

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};

use errors::CoreError;
use models::{
    budget::{Budget, BudgetProgress},
    category::{self, CustomCategory},
    currency::Currency,
    ledger::Ledger,
    recurring::{RecurrencePeriod, RecurringDefinition},
    settings::{ThemePreference, DEFAULT_REMINDER_HOURS},
    transaction::{Transaction, TransactionKind},
};
use reminders::ReminderScheduler;
use services::{
    currency_service::CurrencyService, ledger_service::LedgerService,
    recurring_service::RecurringService,
};
use storage::{manager::StorageManager, store::KeyValueStore};

/// What happens to stored amounts when the display currency changes.
///
/// Relabeling reinterprets every stored number as if it had always been
/// in the new currency; converting rewrites the numbers through the
/// fixed-rate table. Both are explicit, irreversible user choices;
/// transactions carry no currency tag of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyChangeMode {
    RelabelOnly,
    ConvertAmounts,
}

/// Main entry point for the Expense Tracker core library.
///
/// Owns the full application state and the storage/reminder
/// collaborators; every mutation funnels through its methods and
/// triggers a full persist of the affected collection. Persistence
/// failures are logged and the in-memory state kept; the store catches
/// up on the next successful save.
#[must_use]
pub struct ExpenseTracker {
    ledger: Ledger,
    currency: Currency,
    theme: ThemePreference,
    reminders_enabled: bool,
    reminder_hours: Vec<u8>,
    /// When the app was previously launched, as loaded at startup.
    last_launch: Option<DateTime<Utc>>,
    ledger_service: LedgerService,
    recurring_service: RecurringService,
    currency_service: CurrencyService,
    store: Box<dyn KeyValueStore>,
    reminders: Box<dyn ReminderScheduler>,
}

impl std::fmt::Debug for ExpenseTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseTracker")
            .field("transactions", &self.ledger.transactions.len())
            .field("budgets", &self.ledger.budgets.len())
            .field("recurring", &self.ledger.recurring.len())
            .field("currency", &self.currency)
            .field("theme", &self.theme)
            .finish()
    }
}

impl ExpenseTracker {
    /// Load all persisted state and run recurring catch-up against the
    /// current calendar day.
    pub async fn load(
        store: Box<dyn KeyValueStore>,
        reminders: Box<dyn ReminderScheduler>,
    ) -> Self {
        Self::load_at(store, reminders, Utc::now().date_naive()).await
    }

    /// Same as [`load`](Self::load) with an explicit "today". Embedding
    /// hosts that control the clock (and tests) use this directly.
    pub async fn load_at(
        store: Box<dyn KeyValueStore>,
        reminders: Box<dyn ReminderScheduler>,
        today: NaiveDate,
    ) -> Self {
        let ledger = Ledger {
            transactions: StorageManager::load_transactions(store.as_ref()).await,
            budgets: StorageManager::load_budgets(store.as_ref()).await,
            recurring: StorageManager::load_recurring(store.as_ref()).await,
            custom_categories: StorageManager::load_custom_categories(store.as_ref()).await,
        };
        let currency = StorageManager::load_currency(store.as_ref()).await;
        let theme = StorageManager::load_theme(store.as_ref()).await;
        let last_launch = StorageManager::load_last_launch(store.as_ref()).await;
        let reminder_hours = StorageManager::load_reminder_hours(store.as_ref())
            .await
            .unwrap_or_else(|| DEFAULT_REMINDER_HOURS.to_vec());

        // Reminders default to enabled on first launch, and the decision
        // is written back so later launches see an explicit flag.
        let reminders_enabled = match StorageManager::load_reminders_enabled(store.as_ref()).await {
            Some(enabled) => enabled,
            None => {
                if let Err(e) = StorageManager::save_reminders_enabled(store.as_ref(), true).await {
                    log::error!("failed to persist reminder default: {e}");
                }
                true
            }
        };

        let mut tracker = Self {
            ledger,
            currency,
            theme,
            reminders_enabled,
            reminder_hours,
            last_launch,
            ledger_service: LedgerService::new(),
            recurring_service: RecurringService::new(),
            currency_service: CurrencyService::new(),
            store,
            reminders,
        };

        // Materialize everything the recurring definitions owe as of
        // today, and persist before the state is handed to any consumer.
        let generated = tracker.catch_up_recurring(today).await;
        if generated > 0 {
            log::info!("recurring catch-up generated {generated} transaction(s)");
        }

        if let Err(e) =
            StorageManager::save_last_launch(tracker.store.as_ref(), Utc::now()).await
        {
            log::error!("failed to persist last-launch timestamp: {e}");
        }

        tracker
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Record a manual transaction. Returns the freshly assigned id.
    pub async fn add_transaction(
        &mut self,
        date: NaiveDate,
        amount: f64,
        category: impl Into<String>,
        description: Option<String>,
        kind: TransactionKind,
    ) -> Result<i64, CoreError> {
        let mut taken: HashSet<i64> = self.ledger.transactions.iter().map(|t| t.id).collect();
        let id = Transaction::allocate_id(&mut taken);
        self.ledger_service.add_transaction(
            &mut self.ledger,
            Transaction {
                id,
                date,
                amount,
                category: category.into(),
                description,
                kind,
                generated_from_recurring: false,
            },
        )?;
        self.persist_transactions().await;
        Ok(id)
    }

    /// Update an existing transaction, preserving its id.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_transaction(
        &mut self,
        id: i64,
        date: NaiveDate,
        amount: f64,
        category: impl Into<String>,
        description: Option<String>,
        kind: TransactionKind,
    ) -> Result<(), CoreError> {
        self.ledger_service.update_transaction(
            &mut self.ledger,
            id,
            date,
            amount,
            category.into(),
            description,
            kind,
        )?;
        self.persist_transactions().await;
        Ok(())
    }

    /// Remove a transaction by id.
    pub async fn remove_transaction(&mut self, id: i64) -> Result<(), CoreError> {
        self.ledger_service.remove_transaction(&mut self.ledger, id)?;
        self.persist_transactions().await;
        Ok(())
    }

    /// Erase the whole transaction log (budgets, categories and
    /// recurring definitions survive).
    pub async fn clear_transactions(&mut self) {
        self.ledger.transactions.clear();
        self.persist_transactions().await;
    }

    /// All transactions in insertion order.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    /// Transactions newest-first, optionally filtered by kind and/or a
    /// case-insensitive search over category and description.
    #[must_use]
    pub fn transactions_filtered(
        &self,
        kind: Option<TransactionKind>,
        query: &str,
    ) -> Vec<&Transaction> {
        self.ledger_service
            .list_transactions(&self.ledger, kind, query)
    }

    /// Sum of all amounts of one kind, in the active display currency.
    #[must_use]
    pub fn total(&self, kind: TransactionKind) -> f64 {
        self.ledger_service.total(&self.ledger, kind)
    }

    /// Number of transactions of one kind.
    #[must_use]
    pub fn transaction_count(&self, kind: TransactionKind) -> usize {
        self.ledger
            .transactions
            .iter()
            .filter(|t| t.kind == kind)
            .count()
    }

    // ── Currency ────────────────────────────────────────────────────

    /// The active display currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Switch the display currency. `ConvertAmounts` rewrites every
    /// stored transaction amount, budget limit and recurring amount
    /// through the fixed-rate table; `RelabelOnly` leaves the numbers
    /// untouched and only changes how they are labeled. No undo.
    pub async fn change_currency(&mut self, new_currency: Currency, mode: CurrencyChangeMode) {
        if new_currency == self.currency {
            return;
        }

        if mode == CurrencyChangeMode::ConvertAmounts {
            self.ledger_service.convert_amounts(
                &mut self.ledger,
                &self.currency_service,
                self.currency,
                new_currency,
            );
            self.persist_transactions().await;
            self.persist_budgets().await;
            self.persist_recurring().await;
        }

        self.currency = new_currency;
        if let Err(e) = StorageManager::save_currency(self.store.as_ref(), new_currency).await {
            log::error!("failed to persist currency: {e}");
        }
    }

    /// Format an amount for display in the active currency.
    #[must_use]
    pub fn format_amount(&self, amount: f64) -> String {
        self.currency_service.format(amount, self.currency)
    }

    // ── Budgets ─────────────────────────────────────────────────────

    /// Create or replace the budget for a category.
    pub async fn set_budget(
        &mut self,
        category: impl Into<String>,
        limit: f64,
    ) -> Result<(), CoreError> {
        self.ledger_service
            .set_budget(&mut self.ledger, category.into(), limit)?;
        self.persist_budgets().await;
        Ok(())
    }

    /// Remove the budget for a category. Returns whether one existed.
    pub async fn remove_budget(&mut self, category: &str) -> bool {
        let removed = self.ledger_service.remove_budget(&mut self.ledger, category);
        if removed {
            self.persist_budgets().await;
        }
        removed
    }

    /// All budgets.
    #[must_use]
    pub fn budgets(&self) -> &[Budget] {
        &self.ledger.budgets
    }

    /// Budget progress against the current month's expenses.
    #[must_use]
    pub fn budget_progress(&self) -> Vec<BudgetProgress> {
        self.budget_progress_at(Utc::now().date_naive())
    }

    /// Budget progress against the expenses of the month containing
    /// `today`.
    #[must_use]
    pub fn budget_progress_at(&self, today: NaiveDate) -> Vec<BudgetProgress> {
        self.ledger_service.budget_progress(&self.ledger, today)
    }

    // ── Recurring ───────────────────────────────────────────────────

    /// Create a recurring definition and immediately catch it up: a
    /// definition starting in the past materializes its backlog right
    /// away instead of waiting for the next launch. Returns the
    /// definition id.
    pub async fn add_recurring(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        description: Option<String>,
        period: RecurrencePeriod,
        start_date: NaiveDate,
    ) -> Result<i64, CoreError> {
        self.add_recurring_at(
            kind,
            amount,
            category,
            description,
            period,
            start_date,
            Utc::now().date_naive(),
        )
        .await
    }

    /// Same as [`add_recurring`](Self::add_recurring) with an explicit
    /// "today" for the immediate catch-up, mirroring
    /// [`load_at`](Self::load_at).
    #[allow(clippy::too_many_arguments)]
    pub async fn add_recurring_at(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        description: Option<String>,
        period: RecurrencePeriod,
        start_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<i64, CoreError> {
        let category = category.into();
        LedgerService::validate_entry(amount, &category)?;

        let mut taken: HashSet<i64> = self
            .ledger
            .transactions
            .iter()
            .map(|t| t.id)
            .chain(self.ledger.recurring.iter().map(|r| r.id))
            .collect();
        let id = Transaction::allocate_id(&mut taken);

        self.ledger.recurring.push(RecurringDefinition {
            id,
            kind,
            amount,
            category,
            description,
            period,
            start_date,
            last_processed_date: None,
        });
        self.persist_recurring().await;

        self.catch_up_recurring(today).await;
        Ok(id)
    }

    /// Delete a recurring definition. Already generated transactions
    /// stay in the log.
    pub async fn remove_recurring(&mut self, id: i64) -> Result<(), CoreError> {
        let idx = self
            .ledger
            .recurring
            .iter()
            .position(|r| r.id == id)
            .ok_or(CoreError::RecurringNotFound(id))?;
        self.ledger.recurring.remove(idx);
        self.persist_recurring().await;
        Ok(())
    }

    /// All recurring definitions.
    #[must_use]
    pub fn recurring_definitions(&self) -> &[RecurringDefinition] {
        &self.ledger.recurring
    }

    /// Run the recurring engine against `today`, merge whatever it
    /// generated and persist. Returns how many transactions were
    /// created. Safe to call repeatedly: a second run against the same
    /// day generates nothing.
    pub async fn catch_up_recurring(&mut self, today: NaiveDate) -> usize {
        let outcome =
            self.recurring_service
                .process(&self.ledger.recurring, &self.ledger.transactions, today);

        let generated = outcome.new_transactions.len();
        if generated > 0 {
            self.ledger.transactions.extend(outcome.new_transactions);
            self.ledger.recurring = outcome.updated_definitions;
            self.persist_transactions().await;
            self.persist_recurring().await;
        }
        generated
    }

    // ── Categories ──────────────────────────────────────────────────

    /// Add a custom category for one kind of transaction.
    pub async fn add_custom_category(
        &mut self,
        name: impl Into<String>,
        color: impl Into<String>,
        kind: TransactionKind,
    ) -> Result<(), CoreError> {
        self.ledger_service.add_custom_category(
            &mut self.ledger,
            CustomCategory {
                name: name.into().trim().to_string(),
                color: color.into(),
                kind,
            },
        )?;
        self.persist_categories().await;
        Ok(())
    }

    /// Remove a custom category by name. Returns whether one existed.
    pub async fn remove_custom_category(&mut self, name: &str) -> bool {
        let removed = self
            .ledger_service
            .remove_custom_category(&mut self.ledger, name);
        if removed {
            self.persist_categories().await;
        }
        removed
    }

    /// Selectable categories for one kind: built-in defaults plus the
    /// user's custom ones.
    #[must_use]
    pub fn categories_for(&self, kind: TransactionKind) -> Vec<String> {
        self.ledger_service.categories_for(&self.ledger, kind)
    }

    /// Chart color for a category: the custom color when one is defined,
    /// otherwise the built-in palette (gray for unknown labels).
    #[must_use]
    pub fn category_color(&self, name: &str) -> &str {
        self.ledger
            .custom_categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.color.as_str())
            .unwrap_or_else(|| category::default_color(name))
    }

    /// All custom categories.
    #[must_use]
    pub fn custom_categories(&self) -> &[CustomCategory] {
        &self.ledger.custom_categories
    }

    // ── Theme & Reminders ───────────────────────────────────────────

    #[must_use]
    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub async fn set_theme(&mut self, theme: ThemePreference) {
        self.theme = theme;
        if let Err(e) = StorageManager::save_theme(self.store.as_ref(), theme).await {
            log::error!("failed to persist theme: {e}");
        }
    }

    #[must_use]
    pub fn reminders_enabled(&self) -> bool {
        self.reminders_enabled
    }

    #[must_use]
    pub fn reminder_hours(&self) -> &[u8] {
        &self.reminder_hours
    }

    /// Toggle daily reminders. Enabling asks the scheduler for
    /// permission first; when it is denied the flag settles back to
    /// `false`. Returns the effective state.
    pub async fn set_reminders_enabled(&mut self, enabled: bool) -> bool {
        if enabled {
            let granted = match self.reminders.request_permission().await {
                Ok(granted) => granted,
                Err(e) => {
                    log::warn!("reminder permission request failed: {e}");
                    false
                }
            };
            if granted {
                if let Err(e) = self.reminders.schedule_daily(&self.reminder_hours).await {
                    log::warn!("failed to schedule reminders: {e}");
                }
            }
            self.reminders_enabled = granted;
        } else {
            if let Err(e) = self.reminders.cancel_all().await {
                log::warn!("failed to cancel reminders: {e}");
            }
            self.reminders_enabled = false;
        }

        if let Err(e) =
            StorageManager::save_reminders_enabled(self.store.as_ref(), self.reminders_enabled)
                .await
        {
            log::error!("failed to persist reminder flag: {e}");
        }
        self.reminders_enabled
    }

    /// Change at which hours (0–23) the daily reminders fire, and
    /// reschedule when reminders are active.
    pub async fn set_reminder_hours(&mut self, hours: Vec<u8>) -> Result<(), CoreError> {
        if hours.iter().any(|h| *h > 23) {
            return Err(CoreError::ValidationError(
                "Reminder hours must be between 0 and 23".into(),
            ));
        }

        self.reminder_hours = hours;
        if let Err(e) =
            StorageManager::save_reminder_hours(self.store.as_ref(), &self.reminder_hours).await
        {
            log::error!("failed to persist reminder hours: {e}");
        }

        if self.reminders_enabled {
            if let Err(e) = self.reminders.schedule_daily(&self.reminder_hours).await {
                log::warn!("failed to reschedule reminders: {e}");
            }
        }
        Ok(())
    }

    // ── Reset ───────────────────────────────────────────────────────

    /// Wipe the store and return every setting to its default. The
    /// irreversibility warning lives in the presentation layer; by the
    /// time this is called the user has confirmed.
    pub async fn reset_all(&mut self) {
        if let Err(e) = self.store.clear().await {
            log::error!("failed to clear storage: {e}");
        }
        if let Err(e) = self.reminders.cancel_all().await {
            log::warn!("failed to cancel reminders: {e}");
        }
        // The reminders were just cancelled, so record the flag as off;
        // otherwise the next launch would see an unset flag and re-apply
        // the enabled-by-default policy.
        if let Err(e) = StorageManager::save_reminders_enabled(self.store.as_ref(), false).await {
            log::error!("failed to persist reminder flag: {e}");
        }
        self.ledger = Ledger::default();
        self.currency = Currency::Xof;
        self.theme = ThemePreference::Light;
        self.reminders_enabled = false;
        self.reminder_hours = DEFAULT_REMINDER_HOURS.to_vec();
        self.last_launch = None;
    }

    /// When the app was previously launched, if known.
    #[must_use]
    pub fn last_launch(&self) -> Option<DateTime<Utc>> {
        self.last_launch
    }

    // ── Internal persistence (log-and-continue) ─────────────────────

    async fn persist_transactions(&self) {
        if let Err(e) =
            StorageManager::save_transactions(self.store.as_ref(), &self.ledger.transactions).await
        {
            log::error!("failed to persist transactions: {e}");
        }
    }

    async fn persist_budgets(&self) {
        if let Err(e) =
            StorageManager::save_budgets(self.store.as_ref(), &self.ledger.budgets).await
        {
            log::error!("failed to persist budgets: {e}");
        }
    }

    async fn persist_recurring(&self) {
        if let Err(e) =
            StorageManager::save_recurring(self.store.as_ref(), &self.ledger.recurring).await
        {
            log::error!("failed to persist recurring definitions: {e}");
        }
    }

    async fn persist_categories(&self) {
        if let Err(e) = StorageManager::save_custom_categories(
            self.store.as_ref(),
            &self.ledger.custom_categories,
        )
        .await
        {
            log::error!("failed to persist custom categories: {e}");
        }
    }
}
