// USD amount helpers: decimal in the domain, integer cents in the store

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, half away from zero
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Converts a USD amount to whole cents, rounding sub-cent precision away.
/// Amounts far outside the pricing range saturate instead of wrapping.
pub fn to_cents(amount: Decimal) -> i64 {
    (round2(amount) * Decimal::ONE_HUNDRED)
        .to_i64()
        .unwrap_or(if amount.is_sign_negative() { i64::MIN } else { i64::MAX })
}

/// `percent` of `amount`, rounded to cents
pub fn percent_of(amount: Decimal, percent: u32) -> Decimal {
    round2(amount * Decimal::from(percent) / Decimal::ONE_HUNDRED)
}

/// `bp` basis points of `amount`, rounded to cents
pub fn basis_points_of(amount: Decimal, bp: i32) -> Decimal {
    round2(amount * Decimal::from(bp) / Decimal::from(10_000))
}
