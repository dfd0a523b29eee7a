//! Property-based tests for ReversalService.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, JournalEntryId, TransactionId};

use crate::ledger::JournalEntry;
use crate::workflow::reversal::ReversalService;

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn line(debit: Decimal, credit: Decimal, description: String) -> JournalEntry {
    JournalEntry {
        id: JournalEntryId::new(),
        transaction_id: TransactionId::new(),
        account_id: AccountId::new(),
        description,
        debit_amount: debit,
        credit_amount: credit,
    }
}

/// A balanced set: one debit split into several credits.
fn arb_balanced_entries() -> impl Strategy<Value = Vec<JournalEntry>> {
    (
        prop::collection::vec(arb_amount(), 1..5),
        "[a-zA-Z ]{0,20}",
    )
        .prop_map(|(credits, description)| {
            let total: Decimal = credits.iter().copied().sum();
            let mut entries = vec![line(total, Decimal::ZERO, description.clone())];
            entries.extend(
                credits
                    .into_iter()
                    .map(|amount| line(Decimal::ZERO, amount, description.clone())),
            );
            entries
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Reversing entries swap columns and keep accounts and amounts.
    #[test]
    fn prop_reversing_entries_swap_debit_credit(entries in arb_balanced_entries()) {
        let reversed = ReversalService::create_reversing_entries(&entries);

        prop_assert_eq!(reversed.len(), entries.len());
        for (original, reversal) in entries.iter().zip(&reversed) {
            prop_assert_eq!(original.account_id, reversal.account_id);
            prop_assert_eq!(original.debit_amount, reversal.credit_amount);
            prop_assert_eq!(original.credit_amount, reversal.debit_amount);
            prop_assert!(reversal.description.starts_with("Reversal: "));
        }
    }

    /// Balanced originals produce balanced reversals with identical totals.
    #[test]
    fn prop_balanced_entries_produce_balanced_reversal(entries in arb_balanced_entries()) {
        prop_assert!(ReversalService::validate_reversal(&entries));

        let reversed = ReversalService::create_reversing_entries(&entries);
        let debit: Decimal = reversed.iter().map(|e| e.debit_amount).sum();
        let credit: Decimal = reversed.iter().map(|e| e.credit_amount).sum();
        let original_debit: Decimal = entries.iter().map(|e| e.debit_amount).sum();

        prop_assert_eq!(debit, credit);
        prop_assert_eq!(debit, original_debit);
    }
}
