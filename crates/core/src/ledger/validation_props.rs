//! Property-based tests for journal entry validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, JournalEntryId, TransactionId};

use super::entry::JournalEntry;
use super::error::LedgerError;
use super::types::EntrySide;
use super::validation::check_entries;

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

fn side_strategy() -> impl Strategy<Value = EntrySide> {
    prop_oneof![Just(EntrySide::Debit), Just(EntrySide::Credit)]
}

fn other_side(side: EntrySide) -> EntrySide {
    match side {
        EntrySide::Debit => EntrySide::Credit,
        EntrySide::Credit => EntrySide::Debit,
    }
}

fn make_entry(side: EntrySide, amount: Decimal) -> JournalEntry {
    let (debit_amount, credit_amount) = match side {
        EntrySide::Debit => (amount, Decimal::ZERO),
        EntrySide::Credit => (Decimal::ZERO, amount),
    };
    JournalEntry {
        id: JournalEntryId::new(),
        transaction_id: TransactionId::new(),
        account_id: AccountId::new(),
        description: String::new(),
        debit_amount,
        credit_amount,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Zero amount entries are rejected.
    #[test]
    fn prop_zero_amount_rejected(
        side in side_strategy(),
        other_amount in positive_amount(),
    ) {
        let entries = vec![
            make_entry(side, Decimal::ZERO),
            make_entry(other_side(side), other_amount),
        ];

        let result = check_entries(&entries);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidEntryAmount { line: 1 })),
            "Zero amount should be rejected, got: {:?}",
            result
        );
    }

    /// Negative amount entries are rejected.
    #[test]
    fn prop_negative_amount_rejected(
        side in side_strategy(),
        neg_amount in negative_amount(),
        other_amount in positive_amount(),
    ) {
        let entries = vec![
            make_entry(other_side(side), other_amount),
            make_entry(side, neg_amount),
        ];

        let result = check_entries(&entries);
        prop_assert!(
            matches!(result, Err(LedgerError::NegativeAmount { line: 2 })),
            "Negative amount should be rejected, got: {:?}",
            result
        );
    }

    /// Single entry transactions are rejected.
    #[test]
    fn prop_single_entry_rejected(
        side in side_strategy(),
        amount in positive_amount(),
    ) {
        let result = check_entries(&[make_entry(side, amount)]);
        prop_assert!(
            matches!(result, Err(LedgerError::InsufficientEntries { count: 1 })),
            "Single entry should be rejected, got: {:?}",
            result
        );
    }

    /// Any split of a debit total across several credit lines is accepted
    /// and the totals match exactly.
    #[test]
    fn prop_multi_entry_balanced_accepted(
        amounts in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut entries = vec![make_entry(EntrySide::Debit, total)];
        entries.extend(amounts.iter().map(|a| make_entry(EntrySide::Credit, *a)));

        let result = check_entries(&entries);
        prop_assert!(result.is_ok(), "Balanced transaction should be accepted, got: {:?}", result);
        let (lines, totals) = result.unwrap();
        prop_assert_eq!(lines.len(), amounts.len() + 1);
        prop_assert_eq!(totals.debit, totals.credit);
        prop_assert_eq!(totals.debit, total);
    }

    /// Any non-zero imbalance is rejected with the exact totals.
    #[test]
    fn prop_imbalance_rejected(
        amount in positive_amount(),
        gap in positive_amount(),
    ) {
        let entries = vec![
            make_entry(EntrySide::Debit, amount + gap),
            make_entry(EntrySide::Credit, amount),
        ];

        let result = check_entries(&entries);
        let is_exact = matches!(
            result,
            Err(LedgerError::UnbalancedTransaction { debit, credit })
                if debit == amount + gap && credit == amount
        );
        prop_assert!(is_exact, "Imbalance should be rejected, got: {:?}", result);
    }

    /// Amounts with sub-cent precision are rejected.
    #[test]
    fn prop_sub_cent_rejected(
        mills in (1i64..100_000_000i64).prop_filter("not a whole cent", |m| m % 10 != 0),
    ) {
        let amount = Decimal::new(mills, 3);
        let entries = vec![
            make_entry(EntrySide::Debit, amount),
            make_entry(EntrySide::Credit, amount),
        ];

        let result = check_entries(&entries);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidAmountPrecision { line: 1, .. })),
            "Sub-cent amount should be rejected, got: {:?}",
            result
        );
    }
}
