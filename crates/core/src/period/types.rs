//! Period report data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::window::DateWindow;
use crate::share::CategoryId;

/// Income/expense totals for one party over one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Total income.
    pub total_income: Decimal,
    /// Total expense.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub balance: Decimal,
}

impl PeriodSummary {
    /// Adds an income amount.
    pub fn add_income(&mut self, amount: Decimal) {
        self.total_income += amount;
        self.balance = self.total_income - self.total_expense;
    }

    /// Adds an expense amount.
    pub fn add_expense(&mut self, amount: Decimal) {
        self.total_expense += amount;
        self.balance = self.total_income - self.total_expense;
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total_income.is_zero() && self.total_expense.is_zero()
    }
}

impl std::ops::Add for PeriodSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let total_income = self.total_income + rhs.total_income;
        let total_expense = self.total_expense + rhs.total_expense;
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

/// Expense totals for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    /// Category; `None` groups uncategorized expenses.
    pub category: Option<CategoryId>,
    /// Farmer's share of the category's expenses.
    pub farmer: Decimal,
    /// Owner's share of the category's expenses.
    pub owner: Decimal,
    /// Total expenses in the category.
    pub total: Decimal,
    /// Number of transactions.
    pub count: usize,
}

impl CategoryTotals {
    pub(crate) fn new(category: Option<CategoryId>) -> Self {
        Self {
            category,
            farmer: Decimal::ZERO,
            owner: Decimal::ZERO,
            total: Decimal::ZERO,
            count: 0,
        }
    }
}

/// Aggregated totals for one reporting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodReport {
    /// Window covered.
    pub window: DateWindow,
    /// Farmer's totals.
    pub farmer: PeriodSummary,
    /// Owner's totals.
    pub owner: PeriodSummary,
    /// Unsplit field-level totals.
    pub combined: PeriodSummary,
    /// Expense totals per category, ordered by category.
    pub categories: Vec<CategoryTotals>,
    /// Number of transactions inside the window.
    pub transaction_count: usize,
}

impl PeriodReport {
    /// Empty report for a window.
    #[must_use]
    pub fn empty(window: DateWindow) -> Self {
        Self {
            window,
            farmer: PeriodSummary::default(),
            owner: PeriodSummary::default(),
            combined: PeriodSummary::default(),
            categories: Vec::new(),
            transaction_count: 0,
        }
    }

    /// Returns true if farmer + owner reproduce the combined totals.
    #[must_use]
    pub fn is_reconciled(&self) -> bool {
        self.farmer + self.owner == self.combined
    }
}
