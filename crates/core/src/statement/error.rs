//! Collaborator error types.

use fieldshare_shared::AppError;
use fieldshare_shared::types::{FarmerId, FieldId};
use thiserror::Error;

/// Errors reported by settings and transaction sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The farmer has no agreement on the field.
    #[error("No share agreement for farmer {farmer_id} on field {field_id}")]
    AgreementNotFound {
        /// Field.
        field_id: FieldId,
        /// Farmer.
        farmer_id: FarmerId,
    },

    /// The backing store failed.
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::AgreementNotFound { .. } => Self::NotFound(err.to_string()),
            SourceError::Unavailable(msg) => Self::DataSource(msg),
        }
    }
}
