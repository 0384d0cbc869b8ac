use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Whether a transaction is money going out or coming in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Expense => write!(f, "expense"),
            TransactionKind::Income => write!(f, "income"),
        }
    }
}

/// A single recorded expense or income event.
///
/// **Important**: transactions do NOT record the currency they were
/// entered in. The amount is a bare number interpreted under whatever
/// display currency is currently active. Changing currency offers the
/// user an explicit relabel-or-convert choice instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique integer identifier (timestamp-derived, see `allocate_id`)
    pub id: i64,

    /// Date of the transaction (no time component, daily granularity)
    pub date: NaiveDate,

    /// Monetary magnitude, always positive
    pub amount: f64,

    /// Category label, never empty
    pub category: String,

    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,

    /// Expense or income
    pub kind: TransactionKind,

    /// True for transactions materialized by the recurring engine
    /// rather than entered manually.
    #[serde(default)]
    pub generated_from_recurring: bool,
}

impl Transaction {
    /// Allocate a fresh transaction id: current time in microseconds plus
    /// a small random tie-breaker, then bumped past any id already in
    /// `taken`. Guarantees uniqueness within a batch even when many
    /// transactions are generated in the same instant. The chosen id is
    /// inserted into `taken` before returning.
    pub fn allocate_id(taken: &mut HashSet<i64>) -> i64 {
        let mut id = Utc::now().timestamp_micros() + random_tiebreaker();
        while !taken.insert(id) {
            id += 1;
        }
        id
    }
}

fn random_tiebreaker() -> i64 {
    let mut buf = [0u8; 2];
    // An OS entropy failure here is not worth surfacing; the collision
    // loop in `allocate_id` still guarantees uniqueness.
    if getrandom::getrandom(&mut buf).is_err() {
        return 0;
    }
    i64::from(u16::from_le_bytes(buf) % 1000)
}
