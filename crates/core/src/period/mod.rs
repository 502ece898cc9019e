//! Date windows and period aggregation.
//!
//! Already-split transactions are folded into farmer, owner and combined
//! income/expense totals for one reporting window, plus expense totals per
//! category.

pub mod aggregator;
pub mod error;
pub mod types;
pub mod window;

#[cfg(test)]
mod props;

pub use aggregator::PeriodAggregator;
pub use error::PeriodError;
pub use types::{CategoryTotals, PeriodReport, PeriodSummary};
pub use window::{DateWindow, PeriodFilter};
