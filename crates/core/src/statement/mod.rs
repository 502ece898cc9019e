//! Field statements.
//!
//! Ties the calculator and the aggregator to the collaborators that own the
//! data: a settings source for share agreements and category defaults, and a
//! transaction source for the raw records of one field and farmer.

pub mod error;
pub mod memory;
pub mod service;
pub mod sources;

pub use error::SourceError;
pub use memory::{AgreementRecord, InMemoryLedger, LedgerRecord};
pub use service::{FieldStatement, StatementService};
pub use sources::{ShareSettingsSource, TransactionSource};
