//! Period error types.

use chrono::NaiveDate;
use fieldshare_shared::AppError;
use thiserror::Error;

/// Errors that can occur while resolving a reporting window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Month outside 1..=12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Month filter given without a year.
    #[error("Month filter requires a year")]
    MonthWithoutYear,

    /// Only one end of an explicit date range was given.
    #[error("Date range requires both start and end dates")]
    IncompleteDateRange,
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        Self::Validation(err.to_string())
    }
}
