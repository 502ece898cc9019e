//! Property-based tests for share splitting.
//!
//! - Split sum invariant
//! - Override precedence
//! - Portions are non-negative and the farmer portion is bounded by the amount
//! - Amounts up to the accepted maximum split without overflow

use chrono::NaiveDate;
use fieldshare_shared::types::MoneyPrecision;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::{ShareSplitCalculator, SplitOptions};
use super::types::{
    CategoryId, CategoryShareDefaults, MAX_AMOUNT, ShareAgreement, ShareSource, ShareType,
    SplitPolicy, Transaction, TransactionKind,
};

/// Strategy to generate amounts from 0.00 to 1,000,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate percentages from 0.00 to 100.00.
fn percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|v| Decimal::new(v, 2))
}

fn share_type() -> impl Strategy<Value = ShareType> {
    prop_oneof![
        Just(ShareType::Half),
        Just(ShareType::Third),
        Just(ShareType::Quarter)
    ]
}

fn kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![Just(TransactionKind::Income), Just(TransactionKind::Expense)]
}

fn category() -> impl Strategy<Value = Option<CategoryId>> {
    prop_oneof![
        Just(None),
        Just(Some(CategoryId::new("fertilizer"))),
        Just(Some(CategoryId::new("diesel"))),
        Just(Some(CategoryId::new("unlisted"))),
    ]
}

fn precision() -> impl Strategy<Value = MoneyPrecision> {
    (0u32..=4).prop_map(MoneyPrecision)
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn transaction(
    kind: TransactionKind,
    amount: Decimal,
    category: Option<CategoryId>,
) -> Transaction {
    match kind {
        TransactionKind::Income => Transaction::income(amount, date()),
        TransactionKind::Expense => Transaction::expense(amount, category, date()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* valid transaction, farmer + owner == amount exactly.
    #[test]
    fn prop_split_sum_invariant(
        amount in amount(),
        kind in kind(),
        category in category(),
        share_type in share_type(),
        override_pct in percentage(),
        default_pct in percentage(),
        precision in precision(),
    ) {
        let agreement = ShareAgreement::new(share_type)
            .with_override("fertilizer", override_pct)
            .unwrap();
        let defaults = CategoryShareDefaults::from_pairs([
            ("fertilizer", default_pct),
            ("diesel", default_pct),
        ])
        .unwrap();
        let calc = ShareSplitCalculator::new(SplitOptions {
            precision,
            ..SplitOptions::default()
        });

        let split = calc
            .compute_split(&transaction(kind, amount, category), &agreement, &defaults)
            .unwrap();

        prop_assert_eq!(split.farmer_portion + split.owner_portion, amount);
        prop_assert!(split.farmer_portion >= Decimal::ZERO);
        prop_assert!(split.owner_portion >= Decimal::ZERO);
        prop_assert!(split.farmer_portion <= amount);
    }

    /// *For any* expense in an overridden category, the override wins over the default.
    #[test]
    fn prop_override_precedence(
        amount in amount(),
        override_pct in percentage(),
        default_pct in percentage(),
    ) {
        let agreement = ShareAgreement::new(ShareType::Half)
            .with_override("fertilizer", override_pct)
            .unwrap();
        let defaults = CategoryShareDefaults::from_pairs([("fertilizer", default_pct)]).unwrap();
        let tx = Transaction::expense(amount, Some("fertilizer".into()), date());

        let split = ShareSplitCalculator::default()
            .compute_split(&tx, &agreement, &defaults)
            .unwrap();

        prop_assert_eq!(split.percentage_applied, override_pct);
        prop_assert_eq!(split.source, ShareSource::CategoryOverride);
        prop_assert_eq!(
            split.farmer_portion,
            MoneyPrecision::WHOLE.round(amount * override_pct / Decimal::ONE_HUNDRED).min(amount)
        );
    }

    /// *For any* income, the percentage is fixed by the share type and
    /// category settings have no effect.
    #[test]
    fn prop_income_ignores_category_settings(
        amount in amount(),
        share_type in share_type(),
        override_pct in percentage(),
    ) {
        let agreement = ShareAgreement::new(share_type)
            .with_override("fertilizer", override_pct)
            .unwrap();
        let defaults = CategoryShareDefaults::from_pairs([("fertilizer", override_pct)]).unwrap();

        let split = ShareSplitCalculator::default()
            .compute_split(&Transaction::income(amount, date()), &agreement, &defaults)
            .unwrap();

        prop_assert_eq!(split.percentage_applied, share_type.income_percentage());
    }

    /// *For any* recorded share, the frozen policy applies it and the
    /// recompute policy does not.
    #[test]
    fn prop_policies_differ_only_by_recorded_share(
        amount in amount(),
        recorded in percentage(),
        share_type in share_type(),
    ) {
        let tx = Transaction::income(amount, date()).with_recorded_share(recorded);
        let agreement = ShareAgreement::new(share_type);
        let defaults = CategoryShareDefaults::default();

        let frozen = ShareSplitCalculator::new(SplitOptions {
            policy: SplitPolicy::FrozenAtCreation,
            ..SplitOptions::default()
        })
        .compute_split(&tx, &agreement, &defaults)
        .unwrap();
        let recomputed = ShareSplitCalculator::default()
            .compute_split(&tx, &agreement, &defaults)
            .unwrap();

        prop_assert_eq!(frozen.percentage_applied, recorded);
        prop_assert_eq!(recomputed.percentage_applied, share_type.income_percentage());
        prop_assert_eq!(frozen.total(), recomputed.total());
    }

    /// *For any* amount up to the maximum and any precision, the split succeeds
    /// and still sums to the amount.
    #[test]
    fn prop_large_amounts_split_without_overflow(
        units in 0u64..=1_000_000_000_000_000u64,
        scale in 0u32..=6,
        share_type in share_type(),
        precision in (0u32..=6).prop_map(MoneyPrecision),
    ) {
        let amount = (Decimal::from(units) / Decimal::from(10u64.pow(scale))).min(MAX_AMOUNT);
        let calc = ShareSplitCalculator::new(SplitOptions {
            precision,
            ..SplitOptions::default()
        });

        let split = calc
            .compute_split(
                &Transaction::income(amount, date()),
                &ShareAgreement::new(share_type),
                &CategoryShareDefaults::default(),
            )
            .unwrap();

        prop_assert_eq!(split.total(), amount);
    }
}
