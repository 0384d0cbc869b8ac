use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::recurring::RecurringDefinition;
use crate::models::transaction::Transaction;

/// Hard ceiling on occurrences generated per definition in one pass.
/// Catch-up backlogs are expected to be small (days or weeks of missed
/// launches); hitting this limit means a corrupted cursor or start date,
/// and the definition is truncated instead of looping forever.
pub const MAX_OCCURRENCES_PER_RUN: usize = 10_000;

/// Prefix marking generated transactions in their description.
pub const RECURRING_DESCRIPTION_PREFIX: &str = "[Récurrent]";

/// Result of one processing pass: transactions to merge into the log and
/// the definitions with their cursors advanced. The caller owns both
/// merging and persistence; the engine touches no external state.
#[derive(Debug, Default)]
pub struct RecurringOutcome {
    pub new_transactions: Vec<Transaction>,
    pub updated_definitions: Vec<RecurringDefinition>,
}

/// Materializes recurring definitions into concrete transactions.
///
/// Pure business logic: no I/O, no clock access. "Today" is an explicit
/// parameter, which makes catch-up behavior deterministic and testable.
pub struct RecurringService;

impl RecurringService {
    pub fn new() -> Self {
        Self
    }

    /// Generate every transaction that should exist as of `today`.
    ///
    /// For each definition, independently: start from the cursor
    /// (`last_processed_date`, falling back to `start_date`), then keep
    /// stepping one period forward, emitting one transaction per step
    /// that lands on or before `today`. The after-today check happens
    /// *before* a candidate is committed, so the loop terminates even
    /// when a definition generates nothing.
    ///
    /// If the app was closed for N periods, all N missed occurrences are
    /// produced in this single pass. Running the result through `process`
    /// again with the same `today` yields nothing new; the advanced
    /// cursors already sit past the last occurrence.
    ///
    /// Definitions whose `start_date` is after `today` are skipped with
    /// their cursor left untouched.
    #[must_use]
    pub fn process(
        &self,
        definitions: &[RecurringDefinition],
        existing_transactions: &[Transaction],
        today: NaiveDate,
    ) -> RecurringOutcome {
        // Seed the id space with the whole log so generated ids can't
        // collide with manual entries either.
        let mut taken: HashSet<i64> = existing_transactions.iter().map(|t| t.id).collect();

        let mut new_transactions = Vec::new();
        let mut updated_definitions = definitions.to_vec();

        for definition in &mut updated_definitions {
            if definition.start_date > today {
                continue;
            }

            let mut cursor = definition
                .last_processed_date
                .unwrap_or(definition.start_date);
            let mut produced = 0usize;

            loop {
                // A non-representable next date stops this definition;
                // the others still process normally.
                let Some(next) = definition.period.advance(cursor) else {
                    break;
                };
                if next > today {
                    break;
                }
                if produced == MAX_OCCURRENCES_PER_RUN {
                    log::error!(
                        "recurring definition {} produced {} occurrences in one pass; \
                         truncating catch-up (cursor at {})",
                        definition.id,
                        MAX_OCCURRENCES_PER_RUN,
                        cursor,
                    );
                    break;
                }

                new_transactions.push(Self::materialize(definition, next, &mut taken));
                produced += 1;
                cursor = next;
            }

            definition.last_processed_date = Some(cursor);
        }

        RecurringOutcome {
            new_transactions,
            updated_definitions,
        }
    }

    fn materialize(
        definition: &RecurringDefinition,
        date: NaiveDate,
        taken: &mut HashSet<i64>,
    ) -> Transaction {
        let description = match definition.description.as_deref() {
            Some(text) if !text.trim().is_empty() => {
                format!("{RECURRING_DESCRIPTION_PREFIX} {text}")
            }
            _ => RECURRING_DESCRIPTION_PREFIX.to_string(),
        };

        Transaction {
            id: Transaction::allocate_id(taken),
            date,
            amount: definition.amount,
            category: definition.category.clone(),
            description: Some(description),
            kind: definition.kind,
            generated_from_recurring: true,
        }
    }
}

impl Default for RecurringService {
    fn default() -> Self {
        Self::new()
    }
}
