// ═══════════════════════════════════════════════════════════════════
// Recurring Engine Tests: catch-up, idempotence, month/year rollover,
// cursor handling, the defensive iteration cap
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::collections::HashSet;

use expense_tracker_core::models::recurring::{RecurrencePeriod, RecurringDefinition};
use expense_tracker_core::models::transaction::{Transaction, TransactionKind};
use expense_tracker_core::services::recurring_service::{
    RecurringService, MAX_OCCURRENCES_PER_RUN, RECURRING_DESCRIPTION_PREFIX,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn definition(period: RecurrencePeriod, start: NaiveDate) -> RecurringDefinition {
    RecurringDefinition {
        id: 1,
        kind: TransactionKind::Expense,
        amount: 25.0,
        category: "Transport".into(),
        description: Some("Abonnement bus".into()),
        period,
        start_date: start,
        last_processed_date: None,
    }
}

// ═══════════════════════════════════════════════════════════════════
// Catch-Up
// ═══════════════════════════════════════════════════════════════════

mod catch_up {
    use super::*;

    #[test]
    fn daily_backlog_generates_one_per_missed_day() {
        let service = RecurringService::new();
        let today = date(2025, 6, 10);
        let def = definition(RecurrencePeriod::Daily, date(2025, 6, 5));

        let outcome = service.process(&[def], &[], today);

        assert_eq!(outcome.new_transactions.len(), 5);
        let dates: Vec<NaiveDate> = outcome.new_transactions.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2025, 6, 6),
                date(2025, 6, 7),
                date(2025, 6, 8),
                date(2025, 6, 9),
                date(2025, 6, 10),
            ]
        );
        assert_eq!(
            outcome.updated_definitions[0].last_processed_date,
            Some(today)
        );
    }

    #[test]
    fn weekly_backlog() {
        let service = RecurringService::new();
        let today = date(2025, 6, 22);
        let def = definition(RecurrencePeriod::Weekly, date(2025, 6, 1));

        let outcome = service.process(&[def], &[], today);

        let dates: Vec<NaiveDate> = outcome.new_transactions.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2025, 6, 8), date(2025, 6, 15), date(2025, 6, 22)]);
    }

    #[test]
    fn generated_transactions_carry_definition_fields() {
        let service = RecurringService::new();
        let def = definition(RecurrencePeriod::Daily, date(2025, 6, 9));

        let outcome = service.process(&[def], &[], date(2025, 6, 10));

        let tx = &outcome.new_transactions[0];
        assert_eq!(tx.amount, 25.0);
        assert_eq!(tx.category, "Transport");
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert!(tx.generated_from_recurring);
        assert_eq!(
            tx.description.as_deref(),
            Some("[Récurrent] Abonnement bus")
        );
    }

    #[test]
    fn missing_description_still_gets_the_prefix() {
        let service = RecurringService::new();
        let mut def = definition(RecurrencePeriod::Daily, date(2025, 6, 9));
        def.description = None;

        let outcome = service.process(&[def], &[], date(2025, 6, 10));

        assert_eq!(
            outcome.new_transactions[0].description.as_deref(),
            Some(RECURRING_DESCRIPTION_PREFIX)
        );
    }

    #[test]
    fn cursor_resumes_where_it_left_off() {
        let service = RecurringService::new();
        let mut def = definition(RecurrencePeriod::Daily, date(2025, 6, 1));
        def.last_processed_date = Some(date(2025, 6, 8));

        let outcome = service.process(&[def], &[], date(2025, 6, 10));

        let dates: Vec<NaiveDate> = outcome.new_transactions.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2025, 6, 9), date(2025, 6, 10)]);
    }

    #[test]
    fn definitions_process_independently() {
        let service = RecurringService::new();
        let daily = definition(RecurrencePeriod::Daily, date(2025, 6, 8));
        let mut future = definition(RecurrencePeriod::Daily, date(2025, 7, 1));
        future.id = 2;

        let outcome = service.process(&[daily, future], &[], date(2025, 6, 10));

        assert_eq!(outcome.new_transactions.len(), 2);
        assert_eq!(
            outcome.updated_definitions[0].last_processed_date,
            Some(date(2025, 6, 10))
        );
        assert_eq!(outcome.updated_definitions[1].last_processed_date, None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Boundaries
// ═══════════════════════════════════════════════════════════════════

mod boundaries {
    use super::*;

    #[test]
    fn future_start_date_generates_nothing_and_leaves_cursor_unset() {
        let service = RecurringService::new();
        let def = definition(RecurrencePeriod::Daily, date(2025, 6, 11));

        let outcome = service.process(&[def], &[], date(2025, 6, 10));

        assert!(outcome.new_transactions.is_empty());
        assert_eq!(outcome.updated_definitions[0].last_processed_date, None);
    }

    #[test]
    fn start_today_generates_nothing_but_initializes_cursor() {
        let service = RecurringService::new();
        let today = date(2025, 6, 10);
        let def = definition(RecurrencePeriod::Daily, today);

        let outcome = service.process(&[def], &[], today);

        // First occurrence falls one period after the start date
        assert!(outcome.new_transactions.is_empty());
        assert_eq!(
            outcome.updated_definitions[0].last_processed_date,
            Some(today)
        );
    }

    #[test]
    fn monthly_anchored_on_the_31st_clamps_instead_of_skipping() {
        let service = RecurringService::new();
        let def = definition(RecurrencePeriod::Monthly, date(2025, 1, 31));

        let outcome = service.process(&[def], &[], date(2025, 4, 30));

        let dates: Vec<NaiveDate> = outcome.new_transactions.iter().map(|t| t.date).collect();
        // Feb has 28 days in 2025; once clamped, the anchor day stays at 28
        assert_eq!(
            dates,
            vec![date(2025, 2, 28), date(2025, 3, 28), date(2025, 4, 28)]
        );
    }

    #[test]
    fn monthly_candidate_beyond_today_is_not_committed() {
        let service = RecurringService::new();
        let def = definition(RecurrencePeriod::Monthly, date(2025, 1, 31));

        let outcome = service.process(&[def], &[], date(2025, 2, 27));

        assert!(outcome.new_transactions.is_empty());
        assert_eq!(
            outcome.updated_definitions[0].last_processed_date,
            Some(date(2025, 1, 31))
        );
    }

    #[test]
    fn yearly_on_leap_day_clamps_to_february_28() {
        let service = RecurringService::new();
        let def = definition(RecurrencePeriod::Yearly, date(2024, 2, 29));

        let outcome = service.process(&[def], &[], date(2026, 3, 1));

        let dates: Vec<NaiveDate> = outcome.new_transactions.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2025, 2, 28), date(2026, 2, 28)]);
    }

    #[test]
    fn runaway_backlog_is_truncated_at_the_cap() {
        let service = RecurringService::new();
        let today = date(2025, 6, 10);
        let start = today - chrono::Days::new(10_500);
        let def = definition(RecurrencePeriod::Daily, start);

        let outcome = service.process(&[def], &[], today);

        assert_eq!(outcome.new_transactions.len(), MAX_OCCURRENCES_PER_RUN);
        let expected_cursor = start + chrono::Days::new(MAX_OCCURRENCES_PER_RUN as u64);
        assert_eq!(
            outcome.updated_definitions[0].last_processed_date,
            Some(expected_cursor)
        );

        // The next pass picks up the remaining 500 days
        let second = service.process(&outcome.updated_definitions, &[], today);
        assert_eq!(second.new_transactions.len(), 500);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Idempotence & Determinism
// ═══════════════════════════════════════════════════════════════════

mod idempotence {
    use super::*;

    #[test]
    fn second_pass_on_the_same_day_generates_nothing() {
        let service = RecurringService::new();
        let today = date(2025, 6, 10);
        let def = definition(RecurrencePeriod::Daily, date(2025, 6, 1));

        let first = service.process(&[def], &[], today);
        assert_eq!(first.new_transactions.len(), 9);

        let mut log = first.new_transactions.clone();
        let second = service.process(&first.updated_definitions, &log, today);
        assert!(second.new_transactions.is_empty());

        // And a third pass after merging still yields nothing
        log.extend(second.new_transactions);
        let third = service.process(&second.updated_definitions, &log, today);
        assert!(third.new_transactions.is_empty());
    }

    #[test]
    fn output_is_deterministic_apart_from_ids() {
        let service = RecurringService::new();
        let today = date(2025, 6, 10);
        let def = definition(RecurrencePeriod::Weekly, date(2025, 5, 1));

        let a = service.process(&[def.clone()], &[], today);
        let b = service.process(&[def], &[], today);

        let strip = |txs: &[Transaction]| -> Vec<(NaiveDate, String, f64)> {
            txs.iter()
                .map(|t| (t.date, t.category.clone(), t.amount))
                .collect()
        };
        assert_eq!(strip(&a.new_transactions), strip(&b.new_transactions));
        assert_eq!(a.updated_definitions, b.updated_definitions);
    }

    #[test]
    fn batch_ids_are_unique_and_avoid_the_existing_log() {
        let service = RecurringService::new();
        let today = date(2025, 6, 10);
        let def = definition(RecurrencePeriod::Daily, date(2025, 3, 1));

        let existing = vec![Transaction {
            id: 42,
            date: date(2025, 3, 1),
            amount: 9.0,
            category: "Autre".into(),
            description: None,
            kind: TransactionKind::Expense,
            generated_from_recurring: false,
        }];

        let outcome = service.process(&[def], &existing, today);

        let mut seen: HashSet<i64> = existing.iter().map(|t| t.id).collect();
        for tx in &outcome.new_transactions {
            assert!(seen.insert(tx.id), "duplicate id {}", tx.id);
        }
    }
}
