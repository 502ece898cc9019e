//! Share-split error types.

use fieldshare_shared::AppError;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while splitting a transaction.
///
/// All of these are local validation failures: bad input stays bad input, so
/// nothing here is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitError {
    /// Amount is negative, non-numeric or non-finite.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Transaction kind is neither income nor expense.
    #[error("Invalid transaction kind: {0}")]
    InvalidTransactionKind(String),

    /// Share percentage outside 0..=100.
    #[error("Share percentage must be within 0..=100, got {0}")]
    InvalidPercentage(Decimal),

    /// Share type is not one of 1/2, 1/3, 1/4.
    #[error("Invalid share type: {0}")]
    InvalidShareType(String),
}

impl From<SplitError> for AppError {
    fn from(err: SplitError) -> Self {
        Self::Validation(err.to_string())
    }
}
