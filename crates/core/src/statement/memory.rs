//! In-memory ledger implementing both collaborator traits.
//!
//! Used by tests and by the report binary, which loads it from a JSON snapshot.

use std::collections::BTreeSet;

use fieldshare_shared::types::{FarmerId, FieldId};
use serde::{Deserialize, Serialize};

use super::error::SourceError;
use super::sources::{ShareSettingsSource, TransactionSource};
use crate::share::{CategoryShareDefaults, RawTransaction, ShareAgreement};

/// Agreement for one farmer on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementRecord {
    /// Field.
    pub field_id: FieldId,
    /// Farmer.
    pub farmer_id: FarmerId,
    /// The agreement.
    #[serde(flatten)]
    pub agreement: ShareAgreement,
}

/// One raw transaction tagged with its field and farmer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Field.
    pub field_id: FieldId,
    /// Farmer.
    pub farmer_id: FarmerId,
    /// The raw record.
    #[serde(flatten)]
    pub transaction: RawTransaction,
}

/// Settings and transactions held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryLedger {
    /// Global category defaults.
    #[serde(default)]
    pub category_defaults: CategoryShareDefaults,
    /// Farmer agreements.
    #[serde(default)]
    pub agreements: Vec<AgreementRecord>,
    /// Raw transactions.
    #[serde(default)]
    pub transactions: Vec<LedgerRecord>,
}

impl InMemoryLedger {
    /// Creates a ledger with the given category defaults.
    #[must_use]
    pub fn new(category_defaults: CategoryShareDefaults) -> Self {
        Self {
            category_defaults,
            ..Self::default()
        }
    }

    /// Records or replaces the agreement for a farmer on a field.
    pub fn set_agreement(
        &mut self,
        field_id: FieldId,
        farmer_id: FarmerId,
        agreement: ShareAgreement,
    ) {
        self.agreements
            .retain(|a| !(a.field_id == field_id && a.farmer_id == farmer_id));
        self.agreements.push(AgreementRecord {
            field_id,
            farmer_id,
            agreement,
        });
    }

    /// Appends a raw transaction.
    pub fn record(&mut self, field_id: FieldId, farmer_id: FarmerId, transaction: RawTransaction) {
        self.transactions.push(LedgerRecord {
            field_id,
            farmer_id,
            transaction,
        });
    }

    /// Every `(field, farmer)` pair with an agreement, in ID order.
    #[must_use]
    pub fn parties(&self) -> Vec<(FieldId, FarmerId)> {
        self.agreements
            .iter()
            .map(|a| (a.field_id, a.farmer_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl ShareSettingsSource for InMemoryLedger {
    fn category_defaults(&self) -> Result<CategoryShareDefaults, SourceError> {
        Ok(self.category_defaults.clone())
    }

    fn agreement(
        &self,
        field_id: FieldId,
        farmer_id: FarmerId,
    ) -> Result<ShareAgreement, SourceError> {
        self.agreements
            .iter()
            .find(|a| a.field_id == field_id && a.farmer_id == farmer_id)
            .map(|a| a.agreement.clone())
            .ok_or(SourceError::AgreementNotFound {
                field_id,
                farmer_id,
            })
    }
}

impl TransactionSource for InMemoryLedger {
    fn transactions(
        &self,
        field_id: FieldId,
        farmer_id: FarmerId,
    ) -> Result<Vec<RawTransaction>, SourceError> {
        Ok(self
            .transactions
            .iter()
            .filter(|r| r.field_id == field_id && r.farmer_id == farmer_id)
            .map(|r| r.transaction.clone())
            .collect())
    }
}
