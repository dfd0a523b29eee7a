//! Fiscal calendar operations.

use chrono::NaiveDate;
use tally_shared::types::FiscalYearId;
use tracing::info;

use super::LedgerEngine;
use crate::fiscal::{FiscalYear, Period};
use crate::ledger::LedgerError;
use crate::repository::LedgerStore;

/// Maximum length of a fiscal year name.
const FISCAL_YEAR_NAME_MAX_LEN: usize = 50;

impl<S: LedgerStore + ?Sized> LedgerEngine<S> {
    pub(super) fn require_fiscal_year(&self, id: FiscalYearId) -> Result<FiscalYear, LedgerError> {
        self.store
            .fiscal_year(id)?
            .ok_or(LedgerError::FiscalYearNotFound(id))
    }

    /// The requested period, or the year's last period; must lie inside the year.
    pub(super) fn resolve_period(
        fiscal_year: &FiscalYear,
        period: Option<Period>,
    ) -> Result<Period, LedgerError> {
        match period {
            Some(p) if !fiscal_year.contains_period(p) => Err(LedgerError::PeriodOutsideFiscalYear {
                period: p,
                fiscal_year_id: fiscal_year.id,
            }),
            Some(p) => Ok(p),
            None => Ok(fiscal_year.last_period()),
        }
    }

    /// Creates an open fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `start_date > end_date`, `InvalidName`
    /// for a bad name, and `OverlappingFiscalYear` if the range overlaps an
    /// existing year.
    pub fn create_fiscal_year(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<FiscalYear, LedgerError> {
        if start_date > end_date {
            return Err(LedgerError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.chars().count() > FISCAL_YEAR_NAME_MAX_LEN {
            return Err(LedgerError::InvalidName(name.to_string()));
        }

        let fiscal_year = FiscalYear {
            id: FiscalYearId::new(),
            name: trimmed.to_string(),
            start_date,
            end_date,
            is_closed: false,
        };
        self.store.insert_fiscal_year(&fiscal_year)?;

        info!(
            fiscal_year_id = %fiscal_year.id,
            name = %fiscal_year.name,
            %start_date,
            %end_date,
            "fiscal year created"
        );
        Ok(fiscal_year)
    }

    /// Closes a fiscal year. No posting is accepted afterwards.
    ///
    /// # Errors
    ///
    /// Returns `FiscalYearNotFound`, or `FiscalYearClosed` if it is already closed.
    pub fn close_fiscal_year(&self, id: FiscalYearId) -> Result<FiscalYear, LedgerError> {
        let mut fiscal_year = self.require_fiscal_year(id)?;
        if !self.store.close_fiscal_year(id)? {
            return Err(LedgerError::FiscalYearClosed(id));
        }
        fiscal_year.is_closed = true;

        info!(fiscal_year_id = %id, name = %fiscal_year.name, "fiscal year closed");
        Ok(fiscal_year)
    }

    /// The fiscal year containing `date`.
    ///
    /// # Errors
    ///
    /// Returns `NoFiscalYear` if no year covers the date.
    pub fn fiscal_year_for(&self, date: NaiveDate) -> Result<FiscalYear, LedgerError> {
        self.store
            .fiscal_years()?
            .into_iter()
            .find(|fy| fy.contains_date(date))
            .ok_or(LedgerError::NoFiscalYear(date))
    }

    /// All fiscal years ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn fiscal_years(&self) -> Result<Vec<FiscalYear>, LedgerError> {
        Ok(self.store.fiscal_years()?)
    }
}
