//! Fixed ledger policy: fees, interest, joining bonus and currency rounding
//!
//! All functions are pure so they can be tested without any store.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places balances are stored with
pub const CURRENCY_SCALE: u32 = 2;

/// Fee charged on withdrawals and transfers (0.05%)
pub const TRANSACTION_FEE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 4);

/// Interest credited to savings accounts per accrual (0.5%)
pub const SAVINGS_INTEREST_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Opening balance of every savings account
pub const SAVINGS_JOINING_BONUS: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Round a value to the currency scale, halves away from zero
pub fn to_currency_scale(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether an amount can be moved: strictly positive and no sub-cent digits
pub fn is_valid_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO && amount.normalize().scale() <= CURRENCY_SCALE
}

/// Transaction fee for `amount`, at full precision
///
/// Returns `None` on overflow.
pub fn transaction_fee(amount: Decimal) -> Option<Decimal> {
    amount.checked_mul(TRANSACTION_FEE_RATE)
}

/// Interest earned by `balance`, rounded to the currency scale
///
/// Returns `None` on overflow.
pub fn accrued_interest(balance: Decimal) -> Option<Decimal> {
    balance
        .checked_mul(SAVINGS_INTEREST_RATE)
        .map(to_currency_scale)
}
