//! Statement generation.

use chrono::Utc;
use tally_shared::types::{FiscalYearId, StatementId, UserId};
use tracing::info;

use super::LedgerEngine;
use crate::fiscal::Period;
use crate::ledger::LedgerError;
use crate::reports::{FinancialStatement, StatementBuilder, StatementType, TrialBalance};
use crate::repository::{LedgerSnapshot, LedgerStore};

impl<S: LedgerStore + ?Sized> LedgerEngine<S> {
    /// Reads one consistent snapshot and checks `period` against its year.
    fn snapshot_for(
        &self,
        fiscal_year_id: FiscalYearId,
        period: Option<Period>,
    ) -> Result<LedgerSnapshot, LedgerError> {
        let snapshot = self
            .store
            .ledger_snapshot(fiscal_year_id)?
            .ok_or(LedgerError::FiscalYearNotFound(fiscal_year_id))?;
        if period.is_some() {
            Self::resolve_period(&snapshot.fiscal_year, period)?;
        }
        Ok(snapshot)
    }

    /// Generates and stores a statement for one period, or for the whole
    /// fiscal year when `period` is `None`.
    ///
    /// Every figure comes from a single snapshot of the ledger, so a posting
    /// committed meanwhile is either fully included or not at all.
    ///
    /// # Errors
    ///
    /// Returns `FiscalYearNotFound`, `PeriodOutsideFiscalYear`, a not-found
    /// error if the snapshot references a missing account or account type,
    /// or a storage error.
    pub fn generate_statement(
        &self,
        statement_type: StatementType,
        fiscal_year_id: FiscalYearId,
        period: Option<Period>,
        generated_by: UserId,
    ) -> Result<FinancialStatement, LedgerError> {
        let snapshot = self.snapshot_for(fiscal_year_id, period)?;
        let body = StatementBuilder::new(&snapshot)?.build(statement_type, period);

        let statement = FinancialStatement {
            id: StatementId::new(),
            statement_type,
            fiscal_year_id,
            fiscal_year_name: snapshot.fiscal_year.name.clone(),
            period,
            generated_at: Utc::now(),
            generated_by,
            body,
        };
        self.store.insert_statement(&statement)?;

        info!(
            statement_id = %statement.id,
            statement_type = %statement_type,
            %fiscal_year_id,
            period = ?period,
            "statement generated"
        );
        Ok(statement)
    }

    /// Trial balance at the end of `period` (or of the fiscal year). Not stored.
    ///
    /// # Errors
    ///
    /// Returns `FiscalYearNotFound` or `PeriodOutsideFiscalYear`.
    pub fn trial_balance(
        &self,
        fiscal_year_id: FiscalYearId,
        period: Option<Period>,
    ) -> Result<TrialBalance, LedgerError> {
        let snapshot = self.snapshot_for(fiscal_year_id, period)?;
        Ok(StatementBuilder::new(&snapshot)?.trial_balance(period))
    }

    /// Looks up a stored statement.
    ///
    /// # Errors
    ///
    /// Returns `StatementNotFound` for an unknown id.
    pub fn statement(&self, id: StatementId) -> Result<FinancialStatement, LedgerError> {
        self.store
            .statement(id)?
            .ok_or(LedgerError::StatementNotFound(id))
    }

    /// Statements generated for a fiscal year, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `FiscalYearNotFound` for an unknown year.
    pub fn statements(
        &self,
        fiscal_year_id: FiscalYearId,
    ) -> Result<Vec<FinancialStatement>, LedgerError> {
        self.require_fiscal_year(fiscal_year_id)?;
        Ok(self.store.statements(fiscal_year_id)?)
    }
}
