//! Property-based tests for period aggregation.
//!
//! - Aggregation is invariant under permutation of its input
//! - Farmer + owner reproduce the combined totals
//! - Range windows include both bounds and nothing outside them

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregator::PeriodAggregator;
use super::window::DateWindow;
use crate::share::{
    CategoryId, CategoryShareDefaults, ShareAgreement, ShareSplitCalculator, ShareType,
    SplitResult, Transaction,
};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Strategy for one transaction within 2024.
fn transaction() -> impl Strategy<Value = Transaction> {
    (
        any::<bool>(),
        0i64..10_000_000i64,
        0u64..366,
        prop_oneof![
            Just(None),
            Just(Some(CategoryId::new("seed"))),
            Just(Some(CategoryId::new("diesel"))),
        ],
    )
        .prop_map(|(income, cents, offset, category)| {
            let amount = Decimal::new(cents, 2);
            let date = base_date() + Days::new(offset);
            if income {
                Transaction::income(amount, date)
            } else {
                Transaction::expense(amount, category, date)
            }
        })
}

fn split_all(transactions: &[Transaction]) -> Vec<(Transaction, SplitResult)> {
    let calc = ShareSplitCalculator::default();
    let agreement = ShareAgreement::new(ShareType::Third)
        .with_override("seed", Decimal::new(40, 0))
        .unwrap();
    let defaults = CategoryShareDefaults::from_pairs([("diesel", Decimal::new(50, 0))]).unwrap();

    transactions
        .iter()
        .map(|tx| {
            let split = calc.compute_split(tx, &agreement, &defaults).unwrap();
            (tx.clone(), split)
        })
        .collect()
}

fn window() -> impl Strategy<Value = DateWindow> {
    prop_oneof![
        Just(DateWindow::AllTime),
        Just(DateWindow::year(2024)),
        (1u32..=12).prop_map(|m| DateWindow::month(2024, m).unwrap()),
        (0u64..366, 0u64..60).prop_map(|(start, len)| {
            let start = base_date() + Days::new(start);
            DateWindow::range(start, start + Days::new(len)).unwrap()
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* permutation of the input, the report is identical.
    #[test]
    fn prop_aggregation_commutative(
        (original, shuffled) in prop::collection::vec(transaction(), 0..40)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
        window in window(),
    ) {
        let a = split_all(&original);
        let b = split_all(&shuffled);

        let report_a = PeriodAggregator::aggregate(a.iter().map(|(t, s)| (t, s)), &window);
        let report_b = PeriodAggregator::aggregate(b.iter().map(|(t, s)| (t, s)), &window);

        prop_assert_eq!(report_a, report_b);
    }

    /// *For any* input, farmer + owner == combined.
    #[test]
    fn prop_parties_reconcile_to_combined(
        transactions in prop::collection::vec(transaction(), 0..40),
        window in window(),
    ) {
        let items = split_all(&transactions);
        let report = PeriodAggregator::aggregate(items.iter().map(|(t, s)| (t, s)), &window);

        prop_assert!(report.is_reconciled());
        let category_total: Decimal = report.categories.iter().map(|c| c.total).sum();
        prop_assert_eq!(category_total, report.combined.total_expense);
    }

    /// *For any* range, transactions on either bound are included and those
    /// one day outside are excluded.
    #[test]
    fn prop_range_boundaries(
        start_offset in 1u64..300,
        len in 0u64..30,
        cents in 1i64..1_000_000,
    ) {
        let start = base_date() + Days::new(start_offset);
        let end = start + Days::new(len);
        let amount = Decimal::new(cents, 2);
        let window = DateWindow::range(start, end).unwrap();

        let inside = vec![
            Transaction::income(amount, start),
            Transaction::income(amount, end),
        ];
        let outside = vec![
            Transaction::income(amount, start - Days::new(1)),
            Transaction::income(amount, end + Days::new(1)),
        ];
        let all: Vec<Transaction> = inside.into_iter().chain(outside).collect();
        let items = split_all(&all);

        let report = PeriodAggregator::aggregate(items.iter().map(|(t, s)| (t, s)), &window);
        prop_assert_eq!(report.transaction_count, 2);
        prop_assert_eq!(report.combined.total_income, amount * Decimal::TWO);
    }
}
