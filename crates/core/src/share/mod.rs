//! Farmer/owner share-split calculation.
//!
//! A transaction on a shared field is divided between the farmer working it
//! and the field owner:
//! - Income is split by the farmer's share type (1/2, 1/3, 1/4)
//! - Expenses are split by per-category percentages, with farmer overrides
//!   taking precedence over global defaults
//! - The owner portion is always `amount - farmer portion`, so the two
//!   portions add up to the amount exactly

pub mod batch;
pub mod cache;
pub mod calculator;
pub mod error;
pub mod types;

#[cfg(test)]
mod props;

pub use batch::{BatchOutcome, BatchSplitter, RejectedTransaction, SplitTransaction};
pub use cache::SplitCache;
pub use calculator::{ShareSplitCalculator, SplitOptions, Splitter};
pub use error::SplitError;
pub use types::{
    CategoryId, CategoryShareDefaults, MAX_AMOUNT, PercentageTable, RawTransaction,
    ShareAgreement, ShareSource, ShareType, SplitPolicy, SplitResult, Transaction,
    TransactionKind, percentage_label,
};
