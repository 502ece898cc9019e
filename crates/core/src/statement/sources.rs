//! Collaborator seams.

use fieldshare_shared::types::{FarmerId, FieldId};

use super::error::SourceError;
use crate::share::{CategoryShareDefaults, RawTransaction, ShareAgreement};

/// Supplies the current share configuration.
pub trait ShareSettingsSource: Send + Sync {
    /// Current global category defaults.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the settings store fails.
    fn category_defaults(&self) -> Result<CategoryShareDefaults, SourceError>;

    /// The agreement between a farmer and the owner of a field.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::AgreementNotFound` if the farmer does not work the field.
    fn agreement(&self, field_id: FieldId, farmer_id: FarmerId)
        -> Result<ShareAgreement, SourceError>;
}

/// Supplies raw transactions already filtered to one field and farmer.
pub trait TransactionSource: Send + Sync {
    /// Raw records for a field and farmer.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the store fails.
    fn transactions(
        &self,
        field_id: FieldId,
        farmer_id: FarmerId,
    ) -> Result<Vec<RawTransaction>, SourceError>;
}

impl<T: ShareSettingsSource + ?Sized> ShareSettingsSource for &T {
    fn category_defaults(&self) -> Result<CategoryShareDefaults, SourceError> {
        (**self).category_defaults()
    }

    fn agreement(
        &self,
        field_id: FieldId,
        farmer_id: FarmerId,
    ) -> Result<ShareAgreement, SourceError> {
        (**self).agreement(field_id, farmer_id)
    }
}

impl<T: TransactionSource + ?Sized> TransactionSource for &T {
    fn transactions(
        &self,
        field_id: FieldId,
        farmer_id: FarmerId,
    ) -> Result<Vec<RawTransaction>, SourceError> {
        (**self).transactions(field_id, farmer_id)
    }
}
