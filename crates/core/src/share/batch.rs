//! Batch splitting of many transactions.
//!
//! A bad record never stops the batch: it is reported alongside the records
//! that split successfully, so aggregation can proceed over the good ones.

use fieldshare_shared::types::TransactionId;
use rayon::prelude::*;
use serde::Serialize;

use super::calculator::Splitter;
use super::error::SplitError;
use super::types::{CategoryShareDefaults, RawTransaction, ShareAgreement, SplitResult, Transaction};

type IndexedResult = (usize, Option<TransactionId>, Result<SplitTransaction, SplitError>);

/// A transaction together with its split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitTransaction {
    /// Position of the record in the caller's source list.
    pub index: usize,
    /// ID carried by the source record; `None` when one was generated.
    pub transaction_id: Option<TransactionId>,
    /// The validated transaction.
    pub transaction: Transaction,
    /// Its farmer/owner split.
    pub split: SplitResult,
}

/// A record that could not be split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedTransaction {
    /// Position of the record in the caller's source list.
    pub index: usize,
    /// Record ID, when the record carried one.
    pub transaction_id: Option<TransactionId>,
    /// Why it was rejected.
    pub error: SplitError,
}

/// Result of splitting a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Successfully split transactions, in input order.
    pub split: Vec<SplitTransaction>,
    /// Rejected records, in input order.
    pub rejected: Vec<RejectedTransaction>,
}

impl BatchOutcome {
    /// Iterates `(transaction, split)` pairs for aggregation.
    pub fn pairs(&self) -> impl Iterator<Item = (&Transaction, &SplitResult)> {
        self.split.iter().map(|s| (&s.transaction, &s.split))
    }

    /// Number of splits that fell back to the unconfigured-category policy.
    #[must_use]
    pub fn unconfigured_count(&self) -> usize {
        self.split.iter().filter(|s| s.split.is_unconfigured()).count()
    }

    /// Returns true if every record split successfully.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    fn from_results(results: Vec<IndexedResult>) -> Self {
        let mut outcome = Self::default();
        for (index, transaction_id, result) in results {
            match result {
                Ok(split) => outcome.split.push(split),
                Err(error) => outcome.rejected.push(RejectedTransaction {
                    index,
                    transaction_id,
                    error,
                }),
            }
        }
        outcome
    }
}

/// Splits batches of transactions for one agreement and one set of defaults.
pub struct BatchSplitter<'a, S: Splitter> {
    splitter: &'a S,
    agreement: &'a ShareAgreement,
    defaults: &'a CategoryShareDefaults,
}

impl<'a, S: Splitter> BatchSplitter<'a, S> {
    /// Creates a batch splitter.
    #[must_use]
    pub const fn new(
        splitter: &'a S,
        agreement: &'a ShareAgreement,
        defaults: &'a CategoryShareDefaults,
    ) -> Self {
        Self {
            splitter,
            agreement,
            defaults,
        }
    }

    /// Validates and splits raw records in parallel, preserving input order.
    ///
    /// Indices in the outcome are positions in `records`.
    #[must_use]
    pub fn split_all(&self, records: Vec<RawTransaction>) -> BatchOutcome {
        self.split_indexed(records.into_iter().enumerate().collect())
    }

    /// Validates and splits records that already carry their source index.
    ///
    /// Used when the caller drops records before splitting, so that reported
    /// indices still point into the caller's original list.
    #[must_use]
    pub fn split_indexed(&self, records: Vec<(usize, RawTransaction)>) -> BatchOutcome {
        let results: Vec<_> = records
            .into_par_iter()
            .map(|(index, raw)| {
                let transaction_id = raw.id;
                let result = Transaction::try_from(raw)
                    .and_then(|tx| self.split_one(index, transaction_id, tx));
                (index, transaction_id, result)
            })
            .collect();

        BatchOutcome::from_results(results)
    }

    /// Splits already-validated transactions in parallel, preserving input order.
    #[must_use]
    pub fn split_transactions(&self, transactions: Vec<Transaction>) -> BatchOutcome {
        let results: Vec<_> = transactions
            .into_par_iter()
            .enumerate()
            .map(|(index, tx)| {
                let transaction_id = Some(tx.id);
                (index, transaction_id, self.split_one(index, transaction_id, tx))
            })
            .collect();

        BatchOutcome::from_results(results)
    }

    fn split_one(
        &self,
        index: usize,
        transaction_id: Option<TransactionId>,
        transaction: Transaction,
    ) -> Result<SplitTransaction, SplitError> {
        let split = self
            .splitter
            .compute_split(&transaction, self.agreement, self.defaults)?;
        Ok(SplitTransaction {
            index,
            transaction_id,
            transaction,
            split,
        })
    }
}
