//! Fiscal calendar storage.

use tally_core::fiscal::FiscalYear;
use tally_core::repository::{DuplicateKind, FiscalYearRepository, StoreError, StoreResult};
use tally_shared::types::FiscalYearId;

use crate::MemoryStore;

impl FiscalYearRepository for MemoryStore {
    fn fiscal_year(&self, id: FiscalYearId) -> StoreResult<Option<FiscalYear>> {
        Ok(self.read()?.fiscal_years.get(&id).cloned())
    }

    fn fiscal_years(&self) -> StoreResult<Vec<FiscalYear>> {
        let mut years: Vec<FiscalYear> = self.read()?.fiscal_years.values().cloned().collect();
        years.sort_by_key(|fy| fy.start_date);
        Ok(years)
    }

    fn insert_fiscal_year(&self, fiscal_year: &FiscalYear) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.fiscal_years.contains_key(&fiscal_year.id) {
            return Err(StoreError::Duplicate {
                kind: DuplicateKind::Record,
                key: fiscal_year.id.to_string(),
            });
        }
        if let Some(existing) = state
            .fiscal_years
            .values()
            .find(|fy| fy.overlaps(fiscal_year.start_date, fiscal_year.end_date))
        {
            return Err(StoreError::Duplicate {
                kind: DuplicateKind::FiscalYearRange,
                key: existing.name.clone(),
            });
        }
        state.fiscal_years.insert(fiscal_year.id, fiscal_year.clone());
        Ok(())
    }

    fn close_fiscal_year(&self, id: FiscalYearId) -> StoreResult<bool> {
        let mut state = self.write()?;
        let fiscal_year = state
            .fiscal_years
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("fiscal year {id}")))?;
        if fiscal_year.is_closed {
            return Ok(false);
        }
        fiscal_year.is_closed = true;
        Ok(true)
    }
}
