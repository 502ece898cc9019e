//! Share-split domain types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use fieldshare_shared::types::TransactionId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::SplitError;

/// Expense category identifier (e.g. `"fertilizer"`, `"diesel"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Creates a category identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Fraction of income a farmer keeps on a shared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShareType {
    /// Farmer keeps half.
    #[serde(rename = "HALF", alias = "1/2", alias = "half")]
    Half,
    /// Farmer keeps a third.
    #[serde(rename = "THIRD", alias = "1/3", alias = "third")]
    Third,
    /// Farmer keeps a quarter.
    #[serde(rename = "QUARTER", alias = "1/4", alias = "quarter")]
    Quarter,
}

impl ShareType {
    /// Farmer's percentage of income for this share type.
    #[must_use]
    pub fn income_percentage(self) -> Decimal {
        match self {
            Self::Half => Decimal::new(50, 0),
            Self::Third => Decimal::new(3333, 2),
            Self::Quarter => Decimal::new(25, 0),
        }
    }

    /// Fraction label shown on reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Half => "1/2",
            Self::Third => "1/3",
            Self::Quarter => "1/4",
        }
    }
}

impl fmt::Display for ShareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShareType {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1/2" | "half" => Ok(Self::Half),
            "1/3" | "third" => Ok(Self::Third),
            "1/4" | "quarter" => Ok(Self::Quarter),
            _ => Err(SplitError::InvalidShareType(s.to_string())),
        }
    }
}

/// Renders the farmer-share label used next to split amounts, e.g. `(33.33% farmer)`.
#[must_use]
pub fn percentage_label(percentage: Decimal) -> String {
    format!("({}% farmer)", percentage.normalize())
}

fn validate_percentage(percentage: Decimal) -> Result<Decimal, SplitError> {
    if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(SplitError::InvalidPercentage(percentage));
    }
    Ok(percentage)
}

/// Category to farmer-share percentage mapping, every value within 0..=100.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<CategoryId, Decimal>",
    into = "BTreeMap<CategoryId, Decimal>"
)]
pub struct PercentageTable(BTreeMap<CategoryId, Decimal>);

impl PercentageTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the farmer percentage for a category.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidPercentage` if `percentage` is outside 0..=100.
    pub fn insert(&mut self, category: CategoryId, percentage: Decimal) -> Result<(), SplitError> {
        self.0.insert(category, validate_percentage(percentage)?);
        Ok(())
    }

    /// Looks up the farmer percentage for a category.
    #[must_use]
    pub fn get(&self, category: &CategoryId) -> Option<Decimal> {
        self.0.get(category).copied()
    }

    /// Number of configured categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no category is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates categories in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, Decimal)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }
}

impl TryFrom<BTreeMap<CategoryId, Decimal>> for PercentageTable {
    type Error = SplitError;

    fn try_from(map: BTreeMap<CategoryId, Decimal>) -> Result<Self, Self::Error> {
        for percentage in map.values() {
            validate_percentage(*percentage)?;
        }
        Ok(Self(map))
    }
}

impl From<PercentageTable> for BTreeMap<CategoryId, Decimal> {
    fn from(table: PercentageTable) -> Self {
        table.0
    }
}

/// Global default farmer-share percentage per expense category.
///
/// Owned by the configuration collaborator; read-only here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryShareDefaults(pub PercentageTable);

impl CategoryShareDefaults {
    /// Builds defaults from `(category, percentage)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidPercentage` for the first out-of-range value.
    pub fn from_pairs<I, C>(pairs: I) -> Result<Self, SplitError>
    where
        I: IntoIterator<Item = (C, Decimal)>,
        C: Into<CategoryId>,
    {
        let mut table = PercentageTable::new();
        for (category, percentage) in pairs {
            table.insert(category.into(), percentage)?;
        }
        Ok(Self(table))
    }

    /// Default farmer percentage for a category, if configured.
    #[must_use]
    pub fn get(&self, category: &CategoryId) -> Option<Decimal> {
        self.0.get(category)
    }
}

/// How one farmer's work on one field is split with the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareAgreement {
    /// Income share type.
    pub share_type: ShareType,
    /// Farmer-specific expense percentages, taking precedence over defaults.
    #[serde(default)]
    pub category_overrides: PercentageTable,
}

impl ShareAgreement {
    /// Creates an agreement without category overrides.
    #[must_use]
    pub fn new(share_type: ShareType) -> Self {
        Self {
            share_type,
            category_overrides: PercentageTable::new(),
        }
    }

    /// Adds a category override.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidPercentage` if `percentage` is outside 0..=100.
    pub fn with_override(
        mut self,
        category: impl Into<CategoryId>,
        percentage: Decimal,
    ) -> Result<Self, SplitError> {
        self.category_overrides.insert(category.into(), percentage)?;
        Ok(self)
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received (milk sales, crop sales, tractor work).
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// Lowercase name used in records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(SplitError::InvalidTransactionKind(s.to_string())),
        }
    }
}

/// An income or expense event on a shared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Expense category; always `None` for income.
    pub category_id: Option<CategoryId>,
    /// Date used for period bucketing.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: Option<String>,
    /// Farmer share percentage recorded when the transaction was created.
    pub recorded_share: Option<Decimal>,
}

impl Transaction {
    /// Creates an income transaction.
    #[must_use]
    pub fn income(amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: TransactionId::new(),
            kind: TransactionKind::Income,
            amount,
            category_id: None,
            date,
            description: None,
            recorded_share: None,
        }
    }

    /// Creates an expense transaction.
    #[must_use]
    pub fn expense(amount: Decimal, category: Option<CategoryId>, date: NaiveDate) -> Self {
        Self {
            id: TransactionId::new(),
            kind: TransactionKind::Expense,
            amount,
            category_id: category,
            date,
            description: None,
            recorded_share: None,
        }
    }

    /// Sets the share percentage recorded at creation time.
    #[must_use]
    pub fn with_recorded_share(mut self, percentage: Decimal) -> Self {
        self.recorded_share = Some(percentage);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Applies an edit.
    ///
    /// Only amount, date and description change; kind, category and the
    /// recorded share stay as they were at creation.
    #[must_use]
    pub fn edited(&self, amount: Decimal, date: NaiveDate, description: Option<String>) -> Self {
        Self {
            amount,
            date,
            description,
            ..self.clone()
        }
    }
}

/// A transaction as handed over by the data-access collaborator, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Transaction ID, generated if absent.
    #[serde(default)]
    pub id: Option<TransactionId>,
    /// Kind as stored (`"income"` / `"expense"`).
    pub kind: String,
    /// Amount as entered.
    pub amount: String,
    /// Expense category.
    #[serde(default)]
    pub category_id: Option<String>,
    /// Transaction date.
    pub date: NaiveDate,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Farmer share percentage recorded at creation time.
    #[serde(default)]
    pub recorded_share: Option<Decimal>,
}

/// Largest transaction amount accepted (one quadrillion).
///
/// Keeps every split product and any realistic period total well inside
/// `Decimal`'s 96-bit range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

pub(crate) fn validate_amount(amount: Decimal) -> Result<Decimal, SplitError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(SplitError::InvalidAmount(format!("{amount} is negative")));
    }
    if amount > MAX_AMOUNT {
        return Err(SplitError::InvalidAmount(format!(
            "{amount} exceeds the maximum of {MAX_AMOUNT}"
        )));
    }
    Ok(amount)
}

fn parse_amount(raw: &str) -> Result<Decimal, SplitError> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| SplitError::InvalidAmount(format!("'{raw}' is not a finite number")))?;
    validate_amount(amount)
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = SplitError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let kind = TransactionKind::from_str(&raw.kind)?;
        let amount = parse_amount(&raw.amount)?;
        if let Some(share) = raw.recorded_share {
            validate_percentage(share)?;
        }

        let category_id = match kind {
            TransactionKind::Income => None,
            TransactionKind::Expense => raw
                .category_id
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .map(CategoryId::new),
        };

        Ok(Self {
            id: raw.id.unwrap_or_default(),
            kind,
            amount,
            category_id,
            date: raw.date,
            description: raw.description,
            recorded_share: raw.recorded_share,
        })
    }
}

/// Where the applied farmer percentage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareSource {
    /// Income percentage implied by the share type.
    Income(ShareType),
    /// Farmer-specific category override.
    CategoryOverride,
    /// Global category default.
    CategoryDefault,
    /// Neither override nor default; fallback policy applied.
    Unconfigured,
    /// Percentage recorded on the transaction at creation time.
    Recorded,
}

/// Which percentage wins when a transaction carries a recorded share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Always derive the split from current settings.
    #[default]
    RecomputeFromSettings,
    /// Use the recorded share when present, otherwise current settings.
    FrozenAtCreation,
}

/// Farmer and owner portions of one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    /// Farmer's portion.
    pub farmer_portion: Decimal,
    /// Owner's portion; always `amount - farmer_portion`.
    pub owner_portion: Decimal,
    /// Farmer percentage that was applied.
    pub percentage_applied: Decimal,
    /// Where the percentage came from.
    pub source: ShareSource,
}

impl SplitResult {
    /// Sum of both portions, equal to the transaction amount.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.farmer_portion + self.owner_portion
    }

    /// Returns true if the unconfigured-category fallback was applied.
    #[must_use]
    pub fn is_unconfigured(&self) -> bool {
        self.source == ShareSource::Unconfigured
    }

    /// Report label for the applied percentage.
    #[must_use]
    pub fn label(&self) -> String {
        percentage_label(self.percentage_applied)
    }
}
