//! Share-split calculation.
//!
//! The split of one transaction is computed as:
//! 1. Resolve the farmer percentage (share type for income; override, then
//!    default, then the unconfigured fallback for expenses)
//! 2. `farmer = round_half_up(amount * percentage / 100)`
//! 3. `owner = amount - farmer` (never rounded independently)

use fieldshare_shared::config::SplitConfig;
use fieldshare_shared::types::MoneyPrecision;
use rust_decimal::Decimal;

use super::error::SplitError;
use super::types::{
    CategoryShareDefaults, ShareAgreement, ShareSource, SplitPolicy, SplitResult, Transaction,
    TransactionKind, validate_amount,
};

/// Tunables for the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitOptions {
    /// Precision the farmer portion is rounded to.
    pub precision: MoneyPrecision,
    /// Recorded-share policy.
    pub policy: SplitPolicy,
    /// Farmer percentage for expenses with no override and no default.
    pub unconfigured_share: Decimal,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            precision: MoneyPrecision::WHOLE,
            policy: SplitPolicy::RecomputeFromSettings,
            unconfigured_share: Decimal::ZERO,
        }
    }
}

impl SplitOptions {
    /// Builds options from the `split` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidPercentage` if the unconfigured share is
    /// outside 0..=100.
    pub fn from_config(config: &SplitConfig) -> Result<Self, SplitError> {
        let share = config.unconfigured_category_share;
        if share < Decimal::ZERO || share > Decimal::ONE_HUNDRED {
            return Err(SplitError::InvalidPercentage(share));
        }
        Ok(Self {
            precision: MoneyPrecision(config.decimal_places),
            policy: if config.freeze_recorded_shares {
                SplitPolicy::FrozenAtCreation
            } else {
                SplitPolicy::RecomputeFromSettings
            },
            unconfigured_share: share,
        })
    }
}

/// Anything that can split a transaction.
///
/// Implemented by the plain calculator and by the memoising cache, so batch
/// and statement code can take either.
pub trait Splitter: Send + Sync {
    /// Splits one transaction between farmer and owner.
    ///
    /// # Errors
    ///
    /// Returns `SplitError` if the transaction is invalid.
    fn compute_split(
        &self,
        transaction: &Transaction,
        agreement: &ShareAgreement,
        defaults: &CategoryShareDefaults,
    ) -> Result<SplitResult, SplitError>;
}

/// Pure farmer/owner split calculator.
///
/// Stateless apart from its options; safe to share across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShareSplitCalculator {
    options: SplitOptions,
}

impl ShareSplitCalculator {
    /// Creates a calculator with the given options.
    #[must_use]
    pub const fn new(options: SplitOptions) -> Self {
        Self { options }
    }

    /// Returns the calculator options.
    #[must_use]
    pub const fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Splits a transaction between farmer and owner.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use rust_decimal_macros::dec;
    /// use fieldshare_core::share::{
    ///     CategoryShareDefaults, ShareAgreement, ShareSplitCalculator, ShareType, Transaction,
    /// };
    ///
    /// let calculator = ShareSplitCalculator::default();
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let split = calculator
    ///     .compute_split(
    ///         &Transaction::income(dec!(300), date),
    ///         &ShareAgreement::new(ShareType::Third),
    ///         &CategoryShareDefaults::default(),
    ///     )
    ///     .unwrap();
    /// assert_eq!(split.farmer_portion, dec!(100));
    /// assert_eq!(split.owner_portion, dec!(200));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidAmount` for negative amounts or amounts
    /// above [`MAX_AMOUNT`](super::types::MAX_AMOUNT), and
    /// `SplitError::InvalidPercentage` for an out-of-range recorded share.
    pub fn compute_split(
        &self,
        transaction: &Transaction,
        agreement: &ShareAgreement,
        defaults: &CategoryShareDefaults,
    ) -> Result<SplitResult, SplitError> {
        validate_amount(transaction.amount)?;

        let (percentage, source) = self.resolve_percentage(transaction, agreement, defaults)?;
        let (farmer_portion, owner_portion) =
            Self::apply_percentage(transaction.amount, percentage, self.options.precision)?;

        Ok(SplitResult {
            farmer_portion,
            owner_portion,
            percentage_applied: percentage,
            source,
        })
    }

    /// Resolves the farmer percentage for a transaction and where it came from.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidPercentage` if a recorded share is honoured
    /// and lies outside 0..=100.
    pub fn resolve_percentage(
        &self,
        transaction: &Transaction,
        agreement: &ShareAgreement,
        defaults: &CategoryShareDefaults,
    ) -> Result<(Decimal, ShareSource), SplitError> {
        if self.options.policy == SplitPolicy::FrozenAtCreation
            && let Some(recorded) = transaction.recorded_share
        {
            if recorded < Decimal::ZERO || recorded > Decimal::ONE_HUNDRED {
                return Err(SplitError::InvalidPercentage(recorded));
            }
            return Ok((recorded, ShareSource::Recorded));
        }

        let resolved = match transaction.kind {
            TransactionKind::Income => (
                agreement.share_type.income_percentage(),
                ShareSource::Income(agreement.share_type),
            ),
            TransactionKind::Expense => {
                let category = transaction.category_id.as_ref();
                if let Some(pct) = category.and_then(|c| agreement.category_overrides.get(c)) {
                    (pct, ShareSource::CategoryOverride)
                } else if let Some(pct) = category.and_then(|c| defaults.get(c)) {
                    (pct, ShareSource::CategoryDefault)
                } else {
                    (self.options.unconfigured_share, ShareSource::Unconfigured)
                }
            }
        };

        Ok(resolved)
    }

    /// Divides `amount` by `percentage`, returning `(farmer, owner)`.
    ///
    /// The farmer portion never exceeds the amount, so neither portion goes
    /// negative when rounding pushes the farmer share above a sub-unit amount.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidAmount` if the product overflows `Decimal`.
    pub fn apply_percentage(
        amount: Decimal,
        percentage: Decimal,
        precision: MoneyPrecision,
    ) -> Result<(Decimal, Decimal), SplitError> {
        let raw = amount
            .checked_mul(percentage)
            .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(|| {
                SplitError::InvalidAmount(format!("{amount} at {percentage}% overflows"))
            })?;
        let farmer = precision.round(raw).min(amount).max(Decimal::ZERO);
        Ok((farmer, amount - farmer))
    }
}

impl Splitter for ShareSplitCalculator {
    fn compute_split(
        &self,
        transaction: &Transaction,
        agreement: &ShareAgreement,
        defaults: &CategoryShareDefaults,
    ) -> Result<SplitResult, SplitError> {
        Self::compute_split(self, transaction, agreement, defaults)
    }
}
