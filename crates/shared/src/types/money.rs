//! Monetary amount rules.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` stored with a fixed scale of two
//! decimal places and at most fifteen significant digits.

use rust_decimal::Decimal;
use thiserror::Error;

/// Number of decimal places kept for every ledger amount.
pub const MONEY_SCALE: u32 = 2;

/// Maximum number of digits (integer plus fractional) of a ledger amount.
pub const MONEY_MAX_DIGITS: u32 = 15;

/// Reasons an amount cannot be stored in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The amount carries more decimal places than the ledger keeps.
    #[error("amount has more than {MONEY_SCALE} decimal places")]
    TooPrecise,

    /// The amount does not fit in the ledger's digit budget.
    #[error("amount exceeds {MONEY_MAX_DIGITS} digits")]
    TooLarge,
}

/// Checks that an amount fits the ledger precision and returns it rescaled
/// to exactly [`MONEY_SCALE`] decimal places.
///
/// Amounts are never rounded: `10.005` is rejected rather than silently
/// becoming `10.01`.
///
/// # Errors
///
/// Returns [`AmountError`] if the amount is too precise or too large.
pub fn check_amount(amount: Decimal) -> Result<Decimal, AmountError> {
    let mut normalized = amount.normalize();
    if normalized.scale() > MONEY_SCALE {
        return Err(AmountError::TooPrecise);
    }

    let limit = Decimal::from(10_i64.pow(MONEY_MAX_DIGITS - MONEY_SCALE));
    if normalized.abs() >= limit {
        return Err(AmountError::TooLarge);
    }

    normalized.rescale(MONEY_SCALE);
    Ok(normalized)
}
