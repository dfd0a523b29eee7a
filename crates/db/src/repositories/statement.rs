//! Generated statement storage.

use tally_core::reports::FinancialStatement;
use tally_core::repository::{DuplicateKind, StatementRepository, StoreError, StoreResult};
use tally_shared::types::{FiscalYearId, StatementId};

use crate::MemoryStore;

impl StatementRepository for MemoryStore {
    fn insert_statement(&self, statement: &FinancialStatement) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.statements.contains_key(&statement.id) {
            return Err(StoreError::Duplicate {
                kind: DuplicateKind::Record,
                key: statement.id.to_string(),
            });
        }
        state.statements.insert(statement.id, statement.clone());
        state.statement_order.push(statement.id);
        Ok(())
    }

    fn statement(&self, id: StatementId) -> StoreResult<Option<FinancialStatement>> {
        Ok(self.read()?.statements.get(&id).cloned())
    }

    fn statements(&self, fiscal_year_id: FiscalYearId) -> StoreResult<Vec<FinancialStatement>> {
        let state = self.read()?;
        Ok(state
            .statement_order
            .iter()
            .filter_map(|id| state.statements.get(id))
            .filter(|s| s.fiscal_year_id == fiscal_year_id)
            .cloned()
            .collect())
    }
}
