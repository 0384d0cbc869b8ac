use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

/// How often a recurring definition produces a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrencePeriod {
    /// The next occurrence date strictly after `date`.
    ///
    /// Monthly and yearly steps clamp to the last day of the target month
    /// (Jan 31 → Feb 28), so a definition anchored on the 31st never skips
    /// a month. Returns `None` when the next date is not representable;
    /// the engine treats that as "stop advancing" rather than an error.
    pub fn advance(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            RecurrencePeriod::Daily => date.checked_add_days(Days::new(1)),
            RecurrencePeriod::Weekly => date.checked_add_days(Days::new(7)),
            RecurrencePeriod::Monthly => date.checked_add_months(Months::new(1)),
            RecurrencePeriod::Yearly => date.checked_add_months(Months::new(12)),
        }
    }
}

impl std::fmt::Display for RecurrencePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrencePeriod::Daily => write!(f, "daily"),
            RecurrencePeriod::Weekly => write!(f, "weekly"),
            RecurrencePeriod::Monthly => write!(f, "monthly"),
            RecurrencePeriod::Yearly => write!(f, "yearly"),
        }
    }
}

/// A template that periodically generates transactions.
///
/// Only the recurring engine ever moves `last_processed_date`; every
/// other component treats it as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDefinition {
    /// Unique integer identifier
    pub id: i64,

    /// Expense or income
    pub kind: TransactionKind,

    /// Amount of each generated transaction, always positive
    pub amount: f64,

    /// Category for generated transactions
    pub category: String,

    /// Optional description, carried onto generated transactions
    #[serde(default)]
    pub description: Option<String>,

    /// Daily, weekly, monthly or yearly
    pub period: RecurrencePeriod,

    /// No occurrence is produced before this date; the first occurrence
    /// falls one period after it.
    pub start_date: NaiveDate,

    /// Cursor: the last occurrence date already materialized into a
    /// transaction. `None` until the first processing pass.
    #[serde(default)]
    pub last_processed_date: Option<NaiveDate>,
}
