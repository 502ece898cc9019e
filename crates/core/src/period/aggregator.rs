//! Period aggregation.
//!
//! Single pass over `(transaction, split)` pairs: each transaction inside the
//! window adds its portions to the farmer and owner buckets and its full
//! amount to the combined bucket. Addition is commutative, so input order
//! does not affect the result.

use std::collections::BTreeMap;

use super::error::PeriodError;
use super::types::{CategoryTotals, PeriodReport, PeriodSummary};
use super::window::{DateWindow, PeriodFilter};
use crate::share::{CategoryId, SplitResult, Transaction, TransactionKind};

/// Service for folding split transactions into period reports.
pub struct PeriodAggregator;

impl PeriodAggregator {
    /// Aggregates split transactions over a window.
    ///
    /// Dates are assumed valid; transactions outside the window are skipped.
    /// Empty input yields an all-zero report.
    ///
    /// Amounts come from validated transactions, each at most
    /// [`MAX_AMOUNT`](crate::share::MAX_AMOUNT), so the running sums stay
    /// inside `Decimal` range for any batch that fits in memory.
    #[must_use]
    pub fn aggregate<'a, I>(transactions: I, window: &DateWindow) -> PeriodReport
    where
        I: IntoIterator<Item = (&'a Transaction, &'a SplitResult)>,
    {
        let mut farmer = PeriodSummary::default();
        let mut owner = PeriodSummary::default();
        let mut combined = PeriodSummary::default();
        let mut categories: BTreeMap<Option<CategoryId>, CategoryTotals> = BTreeMap::new();
        let mut transaction_count = 0;

        for (transaction, split) in transactions {
            if !window.contains(transaction.date) {
                continue;
            }
            transaction_count += 1;

            match transaction.kind {
                TransactionKind::Income => {
                    farmer.add_income(split.farmer_portion);
                    owner.add_income(split.owner_portion);
                    combined.add_income(transaction.amount);
                }
                TransactionKind::Expense => {
                    farmer.add_expense(split.farmer_portion);
                    owner.add_expense(split.owner_portion);
                    combined.add_expense(transaction.amount);

                    let totals = categories
                        .entry(transaction.category_id.clone())
                        .or_insert_with(|| CategoryTotals::new(transaction.category_id.clone()));
                    totals.farmer += split.farmer_portion;
                    totals.owner += split.owner_portion;
                    totals.total += transaction.amount;
                    totals.count += 1;
                }
            }
        }

        PeriodReport {
            window: *window,
            farmer,
            owner,
            combined,
            categories: categories.into_values().collect(),
            transaction_count,
        }
    }

    /// Resolves a query filter and aggregates over the resulting window.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError` if the filter does not resolve to a window.
    pub fn aggregate_filtered<'a, I>(
        transactions: I,
        filter: &PeriodFilter,
    ) -> Result<PeriodReport, PeriodError>
    where
        I: IntoIterator<Item = (&'a Transaction, &'a SplitResult)>,
    {
        let window = filter.resolve()?;
        Ok(Self::aggregate(transactions, &window))
    }
}
