//! Posting and draft lifecycle tests against the in-memory store.

mod common;

use common::{TestLedger, date};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_core::fiscal::Period;
use tally_core::ledger::{NewJournalEntry, NewTransaction, TransactionStatus};
use tally_core::repository::LedgerRepository;
use tally_core::{ErrorKind, LedgerError};

#[fixture]
fn ledger() -> TestLedger {
    TestLedger::new()
}

#[rstest]
fn test_cash_sale_posts_to_both_accounts(ledger: TestLedger) {
    let receipt = ledger.post(date(3, 15), &ledger.cash, &ledger.revenue, dec!(500));

    assert_eq!(receipt.transaction.status, TransactionStatus::Posted);
    assert!(receipt.transaction.posted_at.is_some());
    assert_eq!(receipt.period, Period::new(2026, 3).unwrap());
    assert_eq!(receipt.totals.debit, dec!(500));
    assert!(receipt.totals.is_balanced);
    assert_eq!(receipt.ledger_rows.len(), 2);

    assert_eq!(ledger.balance(&ledger.cash), dec!(500));
    assert_eq!(ledger.balance(&ledger.revenue), dec!(500));

    let rows = ledger
        .engine
        .store()
        .ledger_rows(ledger.cash.id, ledger.fiscal_year.id)
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].opening_balance, Decimal::ZERO);
    assert_eq!(rows[0].closing_balance, dec!(500));
    assert_eq!(rows[0].version, 1);
}

#[rstest]
fn test_unbalanced_transaction_stays_draft(ledger: TestLedger) {
    let draft = ledger
        .engine
        .create_transaction(NewTransaction::new(
            date(3, 1),
            "Unbalanced",
            ledger.user,
            vec![
                NewJournalEntry::debit(ledger.cash.id, dec!(100)),
                NewJournalEntry::credit(ledger.revenue.id, dec!(90)),
            ],
        ))
        .unwrap();

    let err = ledger.engine.post(draft.id).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::UnbalancedTransaction { debit, credit }
            if debit == dec!(100) && credit == dec!(90)
    ));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(!err.is_retryable());

    let stored = ledger.engine.transaction(draft.id).unwrap();
    assert_eq!(stored.status, TransactionStatus::Draft);
    assert!(stored.posted_at.is_none());
    assert_eq!(ledger.balance(&ledger.cash), Decimal::ZERO);
    assert!(
        ledger
            .engine
            .store()
            .ledger_rows(ledger.cash.id, ledger.fiscal_year.id)
            .unwrap()
            .is_empty()
    );
}

#[rstest]
fn test_fixing_a_draft_then_posting(ledger: TestLedger) {
    let draft = ledger
        .engine
        .create_transaction(NewTransaction::new(
            date(3, 1),
            "Typo",
            ledger.user,
            vec![
                NewJournalEntry::debit(ledger.cash.id, dec!(100)),
                NewJournalEntry::credit(ledger.revenue.id, dec!(90)),
            ],
        ))
        .unwrap();
    assert!(ledger.engine.post(draft.id).is_err());

    let entries = ledger
        .engine
        .replace_entries(
            draft.id,
            vec![
                NewJournalEntry::debit(ledger.cash.id, dec!(100)),
                NewJournalEntry::credit(ledger.revenue.id, dec!(100)),
            ],
        )
        .unwrap();
    assert_eq!(entries.len(), 2);

    ledger.engine.post(draft.id).unwrap();
    assert_eq!(ledger.balance(&ledger.cash), dec!(100));
}

#[rstest]
#[case::zero(dec!(0), dec!(0), "INVALID_ENTRY_AMOUNT")]
#[case::negative(dec!(-10), dec!(0), "NEGATIVE_AMOUNT")]
#[case::sub_cent(dec!(10.001), dec!(0), "INVALID_AMOUNT_PRECISION")]
#[case::both_columns(dec!(10), dec!(10), "INVALID_ENTRY_AMOUNT")]
fn test_bad_entry_is_rejected_at_post(
    ledger: TestLedger,
    #[case] debit: Decimal,
    #[case] credit: Decimal,
    #[case] code: &str,
) {
    let draft = ledger
        .engine
        .create_transaction(NewTransaction::new(
            date(4, 1),
            "Bad line",
            ledger.user,
            vec![
                NewJournalEntry {
                    account_id: ledger.cash.id,
                    description: String::new(),
                    debit_amount: debit,
                    credit_amount: credit,
                },
                NewJournalEntry::credit(ledger.revenue.id, dec!(10)),
            ],
        ))
        .unwrap();

    let err = ledger.engine.post(draft.id).unwrap_err();
    assert_eq!(err.error_code(), code);
    assert_eq!(
        ledger.engine.transaction(draft.id).unwrap().status,
        TransactionStatus::Draft
    );
}

#[rstest]
fn test_single_entry_is_rejected(ledger: TestLedger) {
    let draft = ledger
        .engine
        .create_transaction(NewTransaction::new(
            date(4, 1),
            "One line",
            ledger.user,
            vec![NewJournalEntry::debit(ledger.cash.id, dec!(10))],
        ))
        .unwrap();
    assert!(matches!(
        ledger.engine.post(draft.id),
        Err(LedgerError::InsufficientEntries { count: 1 })
    ));
}

#[rstest]
fn test_inactive_account_is_rejected(ledger: TestLedger) {
    let draft = ledger.draft(date(5, 1), &ledger.cash, &ledger.revenue, dec!(50));
    ledger
        .engine
        .set_account_active(ledger.revenue.id, false)
        .unwrap();

    let err = ledger.engine.post(draft.id).unwrap_err();
    assert!(matches!(err, LedgerError::AccountInactive(id) if id == ledger.revenue.id));

    ledger
        .engine
        .set_account_active(ledger.revenue.id, true)
        .unwrap();
    ledger.engine.post(draft.id).unwrap();
}

#[rstest]
fn test_closed_fiscal_year_rejects_posting(ledger: TestLedger) {
    let draft = ledger.draft(date(6, 1), &ledger.cash, &ledger.revenue, dec!(50));
    ledger
        .engine
        .close_fiscal_year(ledger.fiscal_year.id)
        .unwrap();

    let err = ledger.engine.post(draft.id).unwrap_err();
    assert!(matches!(err, LedgerError::FiscalYearClosed(id) if id == ledger.fiscal_year.id));
    assert_eq!(
        ledger.engine.transaction(draft.id).unwrap().status,
        TransactionStatus::Draft
    );

    let err = ledger
        .engine
        .create_transaction(NewTransaction::new(date(7, 1), "Late", ledger.user, vec![]))
        .unwrap_err();
    assert!(matches!(err, LedgerError::FiscalYearClosed(_)));
}

#[rstest]
fn test_date_outside_any_fiscal_year(ledger: TestLedger) {
    let on = chrono::NaiveDate::from_ymd_opt(2027, 1, 5).unwrap();
    let err = ledger
        .engine
        .create_transaction(NewTransaction::new(on, "Next year", ledger.user, vec![]))
        .unwrap_err();
    assert!(matches!(err, LedgerError::NoFiscalYear(d) if d == on));
}

#[rstest]
fn test_explicit_fiscal_year_must_contain_date(ledger: TestLedger) {
    let mut input = NewTransaction::new(
        chrono::NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        "Wrong year",
        ledger.user,
        vec![],
    );
    input.fiscal_year_id = Some(ledger.fiscal_year.id);
    let err = ledger.engine.create_transaction(input).unwrap_err();
    assert!(matches!(err, LedgerError::DateOutsideFiscalYear { .. }));
}

#[rstest]
fn test_duplicate_reference(ledger: TestLedger) {
    let input = || {
        NewTransaction::new(date(2, 1), "Invoice", ledger.user, vec![]).with_reference("INV-001")
    };
    ledger.engine.create_transaction(input()).unwrap();

    let err = ledger.engine.create_transaction(input()).unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateReference(ref r) if r == "INV-001"));
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[rstest]
#[case::blank("   ".to_string())]
#[case::too_long("X".repeat(51))]
fn test_invalid_reference(ledger: TestLedger, #[case] reference: String) {
    let err = ledger
        .engine
        .create_transaction(
            NewTransaction::new(date(2, 1), "Ref", ledger.user, vec![]).with_reference(reference),
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidReference(_)));
}

#[rstest]
fn test_generated_references_are_unique(ledger: TestLedger) {
    let first = ledger.draft(date(2, 1), &ledger.cash, &ledger.revenue, dec!(1));
    let second = ledger.draft(date(2, 1), &ledger.cash, &ledger.revenue, dec!(1));
    assert_ne!(first.reference, second.reference);
}

#[rstest]
fn test_posted_transaction_is_immutable(ledger: TestLedger) {
    let receipt = ledger.post(date(3, 1), &ledger.cash, &ledger.revenue, dec!(20));
    let id = receipt.transaction.id;

    assert!(matches!(
        ledger.engine.post(id),
        Err(LedgerError::InvalidStatus { action: "post", status: TransactionStatus::Posted })
    ));
    assert!(matches!(
        ledger.engine.replace_entries(id, vec![]),
        Err(LedgerError::InvalidStatus { action: "edit", .. })
    ));
    assert!(matches!(
        ledger.engine.delete_transaction(id),
        Err(LedgerError::InvalidStatus { action: "delete", .. })
    ));
    assert_eq!(ledger.balance(&ledger.cash), dec!(20));
}

#[rstest]
fn test_delete_draft(ledger: TestLedger) {
    let draft = ledger.draft(date(3, 1), &ledger.cash, &ledger.revenue, dec!(20));
    ledger.engine.delete_transaction(draft.id).unwrap();
    assert!(matches!(
        ledger.engine.transaction(draft.id),
        Err(LedgerError::TransactionNotFound(_))
    ));
}

#[rstest]
fn test_backdated_posting_rolls_later_periods_forward(ledger: TestLedger) {
    let march = Period::new(2026, 3).unwrap();
    let june = Period::new(2026, 6).unwrap();

    ledger.post(date(3, 10), &ledger.cash, &ledger.capital, dec!(1000));
    ledger.post(date(6, 10), &ledger.rent, &ledger.cash, dec!(200));
    // lands before both existing rows
    ledger.post(date(1, 20), &ledger.cash, &ledger.revenue, dec!(300));

    let rows = ledger
        .engine
        .store()
        .ledger_rows(ledger.cash.id, ledger.fiscal_year.id)
        .unwrap();
    assert_eq!(rows.len(), 3);
    for pair in rows.windows(2) {
        assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
    }
    assert_eq!(rows[0].opening_balance, Decimal::ZERO);

    let balance_at = |period| {
        ledger
            .engine
            .account_balance(ledger.cash.id, ledger.fiscal_year.id, Some(period))
            .unwrap()
    };
    assert_eq!(balance_at(march), dec!(1300));
    assert_eq!(balance_at(june), dec!(1100));
    assert_eq!(balance_at(Period::new(2026, 12).unwrap()), dec!(1100));
    assert_eq!(ledger.balance(&ledger.cash), dec!(1100));
}

#[rstest]
fn test_same_account_on_both_sides_nets_out(ledger: TestLedger) {
    let receipt = ledger.post(date(3, 1), &ledger.cash, &ledger.cash, dec!(75));
    assert!(receipt.ledger_rows.is_empty());
    assert_eq!(ledger.balance(&ledger.cash), Decimal::ZERO);
}

#[rstest]
fn test_multi_line_transaction(ledger: TestLedger) {
    let draft = ledger
        .engine
        .create_transaction(NewTransaction::new(
            date(8, 1),
            "Partly paid sale",
            ledger.user,
            vec![
                NewJournalEntry::debit(ledger.cash.id, dec!(400)),
                NewJournalEntry::debit(ledger.receivables.id, dec!(600)),
                NewJournalEntry::credit(ledger.revenue.id, dec!(1000)).with_description("Sale"),
            ],
        ))
        .unwrap();
    let receipt = ledger.engine.post(draft.id).unwrap();
    assert_eq!(receipt.totals.credit, dec!(1000));
    assert_eq!(ledger.balance(&ledger.receivables), dec!(600));
    assert_eq!(ledger.balance(&ledger.revenue), dec!(1000));
}

#[rstest]
fn test_period_outside_fiscal_year(ledger: TestLedger) {
    let err = ledger
        .engine
        .account_balance(
            ledger.cash.id,
            ledger.fiscal_year.id,
            Some(Period::new(2027, 1).unwrap()),
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::PeriodOutsideFiscalYear { .. }));
}

#[rstest]
fn test_transactions_listed_by_date(ledger: TestLedger) {
    ledger.post(date(5, 1), &ledger.cash, &ledger.revenue, dec!(1));
    ledger.draft(date(2, 1), &ledger.cash, &ledger.revenue, dec!(1));

    let listed = ledger
        .engine
        .transactions(ledger.fiscal_year.id)
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].transaction_date, date(2, 1));
    assert_eq!(listed[1].status, TransactionStatus::Posted);
}
