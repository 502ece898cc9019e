//! Statement assembly.
//!
//! Pulls one farmer's agreement and transactions for one field, splits them
//! and aggregates the result over the requested window.

use fieldshare_shared::AppResult;
use fieldshare_shared::types::{FarmerId, FieldId};
use serde::Serialize;
use tracing::{debug, warn};

use super::sources::{ShareSettingsSource, TransactionSource};
use crate::period::{PeriodAggregator, PeriodFilter, PeriodReport};
use crate::share::{BatchSplitter, CategoryId, RejectedTransaction, ShareType, Splitter};

/// Split and aggregated view of one farmer's work on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldStatement {
    /// Field.
    pub field_id: FieldId,
    /// Farmer.
    pub farmer_id: FarmerId,
    /// Income share type in force.
    pub share_type: ShareType,
    /// Display label for the share type, e.g. `"1/3"`.
    pub share_label: String,
    /// Display label for the window.
    pub period_label: String,
    /// Aggregated totals.
    pub report: PeriodReport,
    /// Records inside the window that failed validation.
    pub rejected: Vec<RejectedTransaction>,
    /// Expenses split with the unconfigured-category fallback.
    pub unconfigured_expenses: usize,
}

/// Builds field statements from settings and transaction collaborators.
pub struct StatementService<S, T, P> {
    settings: S,
    transactions: T,
    splitter: P,
}

impl<S, T, P> StatementService<S, T, P>
where
    S: ShareSettingsSource,
    T: TransactionSource,
    P: Splitter,
{
    /// Creates a statement service.
    #[must_use]
    pub const fn new(settings: S, transactions: T, splitter: P) -> Self {
        Self {
            settings,
            transactions,
            splitter,
        }
    }

    /// The splitter in use.
    #[must_use]
    pub const fn splitter(&self) -> &P {
        &self.splitter
    }

    /// Builds the statement for a farmer on a field.
    ///
    /// Settings are read fresh on every call. Records outside the window are
    /// dropped before validation; records inside it that fail validation are
    /// reported in `rejected` and left out of the totals.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the filter does not resolve to a
    /// window, `AppError::NotFound` if the farmer has no agreement on the
    /// field, and `AppError::DataSource` if a collaborator fails.
    pub fn build_statement(
        &self,
        field_id: FieldId,
        farmer_id: FarmerId,
        filter: &PeriodFilter,
    ) -> AppResult<FieldStatement> {
        let window = filter.resolve()?;
        let agreement = self.settings.agreement(field_id, farmer_id)?;
        let defaults = self.settings.category_defaults()?;

        // Indices refer to the source list, before window filtering
        let records: Vec<_> = self
            .transactions
            .transactions(field_id, farmer_id)?
            .into_iter()
            .enumerate()
            .filter(|(_, raw)| window.contains(raw.date))
            .collect();
        let record_count = records.len();

        let outcome =
            BatchSplitter::new(&self.splitter, &agreement, &defaults).split_indexed(records);

        for rejected in &outcome.rejected {
            warn!(
                field_id = %field_id,
                farmer_id = %farmer_id,
                index = rejected.index,
                transaction_id = ?rejected.transaction_id,
                error = %rejected.error,
                "Transaction rejected"
            );
        }

        for item in outcome.split.iter().filter(|s| s.split.is_unconfigured()) {
            let category = item.transaction.category_id.as_ref();
            warn!(
                field_id = %field_id,
                farmer_id = %farmer_id,
                index = item.index,
                transaction_id = ?item.transaction_id,
                category = category.map_or("-", CategoryId::as_str),
                "Expense category has no configured share"
            );
        }

        let report = PeriodAggregator::aggregate(outcome.pairs(), &window);

        debug!(
            field_id = %field_id,
            farmer_id = %farmer_id,
            period = %window.label(),
            records = record_count,
            split = outcome.split.len(),
            rejected = outcome.rejected.len(),
            "Statement built"
        );

        Ok(FieldStatement {
            field_id,
            farmer_id,
            share_type: agreement.share_type,
            share_label: agreement.share_type.label().to_string(),
            period_label: window.label(),
            report,
            unconfigured_expenses: outcome.unconfigured_count(),
            rejected: outcome.rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::{CategoryShareDefaults, RawTransaction, ShareAgreement, ShareSplitCalculator};
    use crate::statement::{InMemoryLedger, SourceError};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn raw(
        kind: &str,
        amount: &str,
        category: Option<&str>,
        date: (i32, u32, u32),
    ) -> RawTransaction {
        RawTransaction {
            id: None,
            kind: kind.to_string(),
            amount: amount.to_string(),
            category_id: category.map(str::to_string),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: None,
            recorded_share: None,
        }
    }

    fn ledger() -> (InMemoryLedger, FieldId, FarmerId) {
        let field = FieldId::new();
        let farmer = FarmerId::new();
        let defaults = CategoryShareDefaults::from_pairs([("seed", dec!(50))]).unwrap();
        let mut ledger = InMemoryLedger::new(defaults);
        ledger.set_agreement(
            field,
            farmer,
            ShareAgreement::new(ShareType::Third)
                .with_override("fertilizer", dec!(40))
                .unwrap(),
        );
        ledger.record(field, farmer, raw("income", "300", None, (2024, 3, 5)));
        ledger.record(field, farmer, raw("expense", "100", Some("seed"), (2024, 3, 10)));
        ledger.record(field, farmer, raw("expense", "1000", Some("fertilizer"), (2024, 3, 12)));
        ledger.record(field, farmer, raw("expense", "70", Some("repairs"), (2024, 3, 20)));
        ledger.record(field, farmer, raw("expense", "abc", Some("seed"), (2024, 3, 21)));
        ledger.record(field, farmer, raw("income", "900", None, (2024, 4, 2)));
        (ledger, field, farmer)
    }

    fn service(
        ledger: &InMemoryLedger,
    ) -> StatementService<&InMemoryLedger, &InMemoryLedger, ShareSplitCalculator> {
        StatementService::new(ledger, ledger, ShareSplitCalculator::default())
    }

    #[test]
    fn test_month_statement() {
        let (ledger, field, farmer) = ledger();
        let filter = PeriodFilter {
            year: Some(2024),
            month: Some(3),
            ..PeriodFilter::default()
        };

        let statement = service(&ledger)
            .build_statement(field, farmer, &filter)
            .unwrap();

        assert_eq!(statement.share_label, "1/3");
        assert_eq!(statement.period_label, "2024-03");
        assert_eq!(statement.report.transaction_count, 4);
        assert_eq!(statement.report.farmer.total_income, dec!(100));
        assert_eq!(statement.report.owner.total_income, dec!(200));
        // seed 50, fertilizer 400, repairs 0
        assert_eq!(statement.report.farmer.total_expense, dec!(450));
        assert_eq!(statement.report.owner.total_expense, dec!(720));
        assert_eq!(statement.report.combined.total_expense, dec!(1170));
        assert!(statement.report.is_reconciled());
        assert_eq!(statement.unconfigured_expenses, 1);
        assert_eq!(statement.rejected.len(), 1);
        assert_eq!(statement.rejected[0].index, 4);
    }

    #[test]
    fn test_out_of_window_records_ignored() {
        let (ledger, field, farmer) = ledger();
        let filter = PeriodFilter {
            year: Some(2024),
            month: Some(4),
            ..PeriodFilter::default()
        };

        let statement = service(&ledger)
            .build_statement(field, farmer, &filter)
            .unwrap();

        assert_eq!(statement.report.transaction_count, 1);
        assert_eq!(statement.report.farmer.total_income, dec!(300));
        assert!(statement.rejected.is_empty());
        assert_eq!(statement.unconfigured_expenses, 0);
    }

    #[test]
    fn test_settings_change_applies_to_next_statement() {
        let (mut ledger, field, farmer) = ledger();
        let filter = PeriodFilter::all_time();

        let before = service(&ledger)
            .build_statement(field, farmer, &filter)
            .unwrap();
        assert_eq!(before.report.farmer.total_income, dec!(400));

        ledger.set_agreement(field, farmer, ShareAgreement::new(ShareType::Half));
        let after = service(&ledger)
            .build_statement(field, farmer, &filter)
            .unwrap();
        assert_eq!(after.report.farmer.total_income, dec!(600));
        assert_eq!(after.share_label, "1/2");
    }

    #[test]
    fn test_missing_agreement_is_not_found() {
        let (ledger, field, _) = ledger();
        let err = service(&ledger)
            .build_statement(field, FarmerId::new(), &PeriodFilter::all_time())
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_invalid_filter_is_validation_error() {
        let (ledger, field, farmer) = ledger();
        let filter = PeriodFilter {
            month: Some(3),
            ..PeriodFilter::default()
        };
        let err = service(&ledger)
            .build_statement(field, farmer, &filter)
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_rejected_index_points_into_source_list() {
        let field = FieldId::new();
        let farmer = FarmerId::new();
        let mut ledger = InMemoryLedger::default();
        ledger.set_agreement(field, farmer, ShareAgreement::new(ShareType::Half));
        ledger.record(field, farmer, raw("income", "100", None, (2024, 2, 10)));
        ledger.record(field, farmer, raw("income", "200", None, (2024, 3, 10)));
        ledger.record(field, farmer, raw("income", "oops", None, (2024, 3, 11)));
        let filter = PeriodFilter {
            year: Some(2024),
            month: Some(3),
            ..PeriodFilter::default()
        };

        let statement = service(&ledger)
            .build_statement(field, farmer, &filter)
            .unwrap();

        assert_eq!(statement.report.transaction_count, 1);
        assert_eq!(statement.rejected.len(), 1);
        assert_eq!(statement.rejected[0].index, 2);
        assert_eq!(statement.rejected[0].transaction_id, None);
    }

    #[test]
    fn test_statements_for_id_less_records_are_reproducible() {
        let (ledger, field, farmer) = ledger();
        let first = service(&ledger)
            .build_statement(field, farmer, &PeriodFilter::all_time())
            .unwrap();
        let second = service(&ledger)
            .build_statement(field, farmer, &PeriodFilter::all_time())
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    struct DownStore;

    impl TransactionSource for DownStore {
        fn transactions(
            &self,
            _field_id: FieldId,
            _farmer_id: FarmerId,
        ) -> Result<Vec<RawTransaction>, SourceError> {
            Err(SourceError::Unavailable("connection refused".into()))
        }
    }

    #[test]
    fn test_source_failure_is_data_source_error() {
        let (ledger, field, farmer) = ledger();
        let service = StatementService::new(&ledger, DownStore, ShareSplitCalculator::default());
        let err = service
            .build_statement(field, farmer, &PeriodFilter::all_time())
            .unwrap_err();
        assert_eq!(err.error_code(), "DATA_SOURCE_ERROR");
    }
}
