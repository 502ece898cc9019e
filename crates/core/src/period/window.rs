//! Reporting windows.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::PeriodError;

/// The date window a report covers. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", try_from = "WindowRepr")]
pub enum DateWindow {
    /// Every transaction.
    #[default]
    AllTime,
    /// One calendar year.
    Year {
        /// Calendar year.
        year: i32,
    },
    /// One calendar month.
    Month {
        /// Calendar year.
        year: i32,
        /// Month, 1..=12.
        month: u32,
    },
    /// Explicit inclusive range.
    Range {
        /// First day included.
        start: NaiveDate,
        /// Last day included.
        end: NaiveDate,
    },
}

impl DateWindow {
    /// Window covering a calendar year.
    #[must_use]
    pub const fn year(year: i32) -> Self {
        Self::Year { year }
    }

    /// Window covering a calendar month.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidMonth` if `month` is outside 1..=12.
    pub fn month(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Self::Month { year, month })
    }

    /// Window covering an explicit inclusive range.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidDateRange` if `start` is after `end`.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidDateRange { start, end });
        }
        Ok(Self::Range { start, end })
    }

    /// Returns true if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::AllTime => true,
            Self::Year { year } => date.year() == year,
            Self::Month { year, month } => date.year() == year && date.month() == month,
            Self::Range { start, end } => date >= start && date <= end,
        }
    }

    /// First and last day of the window, or `None` for all-time.
    #[must_use]
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Self::AllTime => None,
            Self::Year { year } => Some((
                NaiveDate::from_ymd_opt(year, 1, 1)?,
                NaiveDate::from_ymd_opt(year, 12, 31)?,
            )),
            Self::Month { year, month } => {
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                let next = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)?
                };
                Some((first, next.pred_opt()?))
            }
            Self::Range { start, end } => Some((start, end)),
        }
    }

    /// Human-readable label used in report headings.
    #[must_use]
    pub fn label(&self) -> String {
        match *self {
            Self::AllTime => "All time".to_string(),
            Self::Year { year } => year.to_string(),
            Self::Month { year, month } => format!("{year}-{month:02}"),
            Self::Range { start, end } => format!("{start} to {end}"),
        }
    }
}

/// Wire form of [`DateWindow`], checked on the way in.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WindowRepr {
    AllTime,
    Year { year: i32 },
    Month { year: i32, month: u32 },
    Range { start: NaiveDate, end: NaiveDate },
}

impl TryFrom<WindowRepr> for DateWindow {
    type Error = PeriodError;

    fn try_from(repr: WindowRepr) -> Result<Self, Self::Error> {
        match repr {
            WindowRepr::AllTime => Ok(Self::AllTime),
            WindowRepr::Year { year } => Ok(Self::year(year)),
            WindowRepr::Month { year, month } => Self::month(year, month),
            WindowRepr::Range { start, end } => Self::range(start, end),
        }
    }
}

/// Query filter as supplied by the page that asks for a report.
///
/// A complete explicit range takes precedence over year/month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    /// Calendar year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Month, requires `year`.
    #[serde(default)]
    pub month: Option<u32>,
    /// Explicit range start.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Explicit range end.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl PeriodFilter {
    /// Filter matching every transaction.
    #[must_use]
    pub const fn all_time() -> Self {
        Self {
            year: None,
            month: None,
            start_date: None,
            end_date: None,
        }
    }

    /// Resolves the filter into exactly one window.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError` for a half-open range, a reversed range, a month
    /// without a year, or a month outside 1..=12.
    pub fn resolve(&self) -> Result<DateWindow, PeriodError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => return DateWindow::range(start, end),
            (Some(_), None) | (None, Some(_)) => return Err(PeriodError::IncompleteDateRange),
            (None, None) => {}
        }

        match (self.year, self.month) {
            (None, None) => Ok(DateWindow::AllTime),
            (Some(year), None) => Ok(DateWindow::year(year)),
            (Some(year), Some(month)) => DateWindow::month(year, month),
            (None, Some(_)) => Err(PeriodError::MonthWithoutYear),
        }
    }
}
