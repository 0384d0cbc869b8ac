use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CoreError;
use crate::models::budget::Budget;
use crate::models::category::CustomCategory;
use crate::models::currency::Currency;
use crate::models::recurring::RecurringDefinition;
use crate::models::settings::ThemePreference;
use crate::models::transaction::Transaction;

use super::keys;
use super::store::KeyValueStore;

/// Typed load/save operations on top of the raw key-value store.
///
/// Error policy mirrors the weak-consistency model of the app: loads
/// never fail upward: a read error, a parse error or a failed record-set
/// validation is logged and replaced by the empty/default value. Saves
/// return `Result` so the orchestrator can log and move on.
pub struct StorageManager;

impl StorageManager {
    // ── Transactions ────────────────────────────────────────────────

    /// Load the transaction log: primary key first, backup key as
    /// fallback. A record set that fails to parse, or that contains a
    /// non-positive amount or an empty category, is discarded as a whole
    /// and replaced by an empty log.
    pub async fn load_transactions(store: &dyn KeyValueStore) -> Vec<Transaction> {
        let raw = match Self::read(store, keys::TRANSACTIONS).await {
            Some(value) => Some(value),
            None => Self::read(store, keys::TRANSACTIONS_BACKUP).await,
        };
        let Some(raw) = raw else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<Transaction>>(&raw) {
            Ok(parsed) if parsed.iter().all(Self::record_is_sound) => parsed,
            Ok(_) => {
                log::warn!("persisted transactions failed validation; starting empty");
                Vec::new()
            }
            Err(e) => {
                log::warn!("could not parse persisted transactions: {e}; starting empty");
                Vec::new()
            }
        }
    }

    /// Persist the transaction log under the primary and the backup key
    /// in one save.
    pub async fn save_transactions(
        store: &dyn KeyValueStore,
        transactions: &[Transaction],
    ) -> Result<(), CoreError> {
        let json = to_json(transactions)?;
        store.set(keys::TRANSACTIONS, &json).await?;
        store.set(keys::TRANSACTIONS_BACKUP, &json).await
    }

    fn record_is_sound(transaction: &Transaction) -> bool {
        transaction.amount.is_finite()
            && transaction.amount > 0.0
            && !transaction.category.trim().is_empty()
    }

    // ── Budgets / Recurring / Categories ────────────────────────────

    pub async fn load_budgets(store: &dyn KeyValueStore) -> Vec<Budget> {
        Self::load_list(store, keys::BUDGETS, "budgets").await
    }

    pub async fn save_budgets(
        store: &dyn KeyValueStore,
        budgets: &[Budget],
    ) -> Result<(), CoreError> {
        store.set(keys::BUDGETS, &to_json(budgets)?).await
    }

    pub async fn load_recurring(store: &dyn KeyValueStore) -> Vec<RecurringDefinition> {
        Self::load_list(store, keys::RECURRING, "recurring definitions").await
    }

    pub async fn save_recurring(
        store: &dyn KeyValueStore,
        definitions: &[RecurringDefinition],
    ) -> Result<(), CoreError> {
        store.set(keys::RECURRING, &to_json(definitions)?).await
    }

    pub async fn load_custom_categories(store: &dyn KeyValueStore) -> Vec<CustomCategory> {
        Self::load_list(store, keys::CUSTOM_CATEGORIES, "custom categories").await
    }

    pub async fn save_custom_categories(
        store: &dyn KeyValueStore,
        categories: &[CustomCategory],
    ) -> Result<(), CoreError> {
        store
            .set(keys::CUSTOM_CATEGORIES, &to_json(categories)?)
            .await
    }

    // ── Preferences ─────────────────────────────────────────────────

    /// Active display currency; XOF when absent or unrecognized.
    pub async fn load_currency(store: &dyn KeyValueStore) -> Currency {
        match Self::read(store, keys::CURRENCY).await {
            Some(code) => code.parse().unwrap_or_else(|_| {
                log::warn!("unrecognized stored currency '{code}'; falling back to XOF");
                Currency::Xof
            }),
            None => Currency::Xof,
        }
    }

    pub async fn save_currency(
        store: &dyn KeyValueStore,
        currency: Currency,
    ) -> Result<(), CoreError> {
        store.set(keys::CURRENCY, currency.code()).await
    }

    pub async fn load_theme(store: &dyn KeyValueStore) -> ThemePreference {
        match Self::read(store, keys::THEME).await {
            Some(value) => value.parse().unwrap_or(ThemePreference::Light),
            None => ThemePreference::Light,
        }
    }

    pub async fn save_theme(
        store: &dyn KeyValueStore,
        theme: ThemePreference,
    ) -> Result<(), CoreError> {
        store.set(keys::THEME, &theme.to_string()).await
    }

    /// `None` means the flag was never written; the orchestrator then
    /// applies its enabled-by-default policy and writes the key back.
    pub async fn load_reminders_enabled(store: &dyn KeyValueStore) -> Option<bool> {
        Self::read(store, keys::REMINDERS_ENABLED)
            .await
            .map(|value| value == "true")
    }

    pub async fn save_reminders_enabled(
        store: &dyn KeyValueStore,
        enabled: bool,
    ) -> Result<(), CoreError> {
        let value = if enabled { "true" } else { "false" };
        store.set(keys::REMINDERS_ENABLED, value).await
    }

    pub async fn load_reminder_hours(store: &dyn KeyValueStore) -> Option<Vec<u8>> {
        let raw = Self::read(store, keys::REMINDER_HOURS).await?;
        match serde_json::from_str::<Vec<u8>>(&raw) {
            Ok(hours) => Some(hours),
            Err(e) => {
                log::warn!("could not parse reminder hours: {e}; using defaults");
                None
            }
        }
    }

    pub async fn save_reminder_hours(
        store: &dyn KeyValueStore,
        hours: &[u8],
    ) -> Result<(), CoreError> {
        store.set(keys::REMINDER_HOURS, &to_json(hours)?).await
    }

    // ── Last launch ─────────────────────────────────────────────────

    pub async fn load_last_launch(store: &dyn KeyValueStore) -> Option<DateTime<Utc>> {
        let raw = Self::read(store, keys::LAST_LAUNCH).await?;
        match raw.parse::<DateTime<Utc>>() {
            Ok(instant) => Some(instant),
            Err(e) => {
                log::warn!("could not parse last-launch timestamp '{raw}': {e}");
                None
            }
        }
    }

    pub async fn save_last_launch(
        store: &dyn KeyValueStore,
        instant: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        store.set(keys::LAST_LAUNCH, &instant.to_rfc3339()).await
    }

    // ── Internal ────────────────────────────────────────────────────

    async fn load_list<T: DeserializeOwned>(
        store: &dyn KeyValueStore,
        key: &str,
        what: &str,
    ) -> Vec<T> {
        let Some(raw) = Self::read(store, key).await else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("could not parse persisted {what}: {e}; starting empty");
                Vec::new()
            }
        }
    }

    async fn read(store: &dyn KeyValueStore, key: &str) -> Option<String> {
        match store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("failed to read {key}: {e}");
                None
            }
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string(value).map_err(|e| CoreError::Serialization(e.to_string()))
}
