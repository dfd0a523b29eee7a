//! Fiscal years and monthly ledger periods.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tally_shared::types::FiscalYearId;
use thiserror::Error;

/// A calendar month used as the ledger period key, formatted `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(NaiveDate);

/// Error returned when a period string is not `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid period '{0}', expected YYYY-MM")]
pub struct PeriodParseError(String);

impl Period {
    /// Creates a period for the given year and month (1-12).
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The period containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        // Day 1 of an existing date's month always exists.
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Calendar month (1-12).
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// First day of the period.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Last day of the period.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// The following period.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// Returns true if `date` falls inside this period.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::from_date(date) == self
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodParseError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

/// Fiscal year definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYear {
    /// Unique identifier.
    pub id: FiscalYearId,
    /// Year name (e.g., "FY2026").
    pub name: String,
    /// Start date of the fiscal year.
    pub start_date: NaiveDate,
    /// End date of the fiscal year (inclusive).
    pub end_date: NaiveDate,
    /// Closed years accept no further postings.
    pub is_closed: bool,
}

impl FiscalYear {
    /// Returns true if the given date falls within this fiscal year.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if the two date ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && end >= self.start_date
    }

    /// First ledger period of the year.
    #[must_use]
    pub fn first_period(&self) -> Period {
        Period::from_date(self.start_date)
    }

    /// Last ledger period of the year.
    #[must_use]
    pub fn last_period(&self) -> Period {
        Period::from_date(self.end_date)
    }

    /// Returns true if the period lies inside the fiscal year.
    #[must_use]
    pub fn contains_period(&self, period: Period) -> bool {
        period >= self.first_period() && period <= self.last_period()
    }

    /// All periods touched by the fiscal year, in order.
    #[must_use]
    pub fn periods(&self) -> Vec<Period> {
        let last = self.last_period();
        let mut periods = Vec::with_capacity(12);
        let mut current = Some(self.first_period());
        while let Some(period) = current.filter(|p| *p <= last) {
            periods.push(period);
            current = period.next();
        }
        periods
    }

    /// The date a statement for `period` (or the whole year) is drawn up to.
    #[must_use]
    pub fn boundary_date(&self, period: Option<Period>) -> NaiveDate {
        period.map_or(self.end_date, |p| p.last_day().min(self.end_date))
    }

    /// The first date covered by a statement for `period` (or the whole year).
    #[must_use]
    pub fn range_start(&self, period: Option<Period>) -> NaiveDate {
        period.map_or(self.start_date, |p| p.first_day().max(self.start_date))
    }
}
