//! Monetary amounts are stored as integer cents (i64). Decimal only
//! appears at the JSON boundary.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::prelude::*;

/// Converts a boundary amount to cents, rounding half-up to 2 decimal
/// places. Rejects amounts that are not strictly positive after rounding.
pub fn to_cents(amount: Decimal) -> Result<i64> {
  if amount <= Decimal::ZERO {
    return Err(Error::InvalidArgs("Amount must be positive".into()));
  }

  let cents = amount
    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    .checked_mul(Decimal::from(100))
    .and_then(|c| c.to_i64())
    .ok_or_else(|| Error::InvalidArgs("Amount out of range".into()))?;

  if cents <= 0 {
    return Err(Error::InvalidArgs("Amount must be at least 0.01".into()));
  }

  Ok(cents)
}

pub fn from_cents(cents: i64) -> Decimal {
  Decimal::new(cents, 2)
}

/// Pinned commission policy: `amount * pct / 100`, half-up at cent
/// precision. Computed once when the sale is recorded.
pub fn commission_cents(amount_cents: i64, pct: i32) -> i64 {
  (amount_cents * pct as i64 + 50) / 100
}

/// Half-up division for derived averages.
pub fn average_cents(total_cents: i64, count: i64) -> i64 {
  if count == 0 { 0 } else { (total_cents * 2 + count) / (count * 2) }
}

#[cfg(test)]
mod tests {
  use rust_decimal_macros::dec;

  use super::*;

  #[test]
  fn forty_pct_of_1000() {
    let cents = to_cents(dec!(1000.00)).unwrap();
    assert_eq!(cents, 100_000);
    assert_eq!(commission_cents(cents, 40), 40_000);
    assert_eq!(from_cents(40_000), dec!(400.00));
  }

  #[test]
  fn half_cent_rounds_up() {
    // 25% of 0.02 is 0.005 -> 0.01
    assert_eq!(commission_cents(2, 25), 1);
    // 1% of 0.49 is 0.0049 -> 0.00
    assert_eq!(commission_cents(49, 1), 0);
    // 1% of 0.50 is 0.005 -> 0.01
    assert_eq!(commission_cents(50, 1), 1);
  }

  #[test]
  fn boundary_amounts_rejected() {
    assert!(to_cents(dec!(0)).is_err());
    assert!(to_cents(dec!(-5)).is_err());
    // rounds to 0.00, which is not a recordable amount
    assert!(to_cents(dec!(0.004)).is_err());
  }

  #[test]
  fn sub_cent_input_rounds_half_up() {
    assert_eq!(to_cents(dec!(10.155)).unwrap(), 1016);
    assert_eq!(to_cents(dec!(10.154)).unwrap(), 1015);
    assert_eq!(to_cents(dec!(0.005)).unwrap(), 1);
  }

  #[test]
  fn average_is_half_up() {
    assert_eq!(average_cents(100, 3), 33);
    assert_eq!(average_cents(101, 2), 51);
    assert_eq!(average_cents(0, 0), 0);
  }
}
