//! Common utility functions for tax calculations.
//!
//! Rounding, clamping and currency rendering shared by the tax functions,
//! the solver and front ends.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the smaller of two decimal values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// Clamps negatives to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

/// Renders an amount as US currency: `$` prefix, thousands separators, two
/// decimals (half-up).
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::format_currency;
///
/// assert_eq!(format_currency(dec!(1234.5)), "$1,234.50");
/// assert_eq!(format_currency(dec!(-98765.432)), "-$98,765.43");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// `value` as a percentage of `gross`, one decimal place. `None` when gross
/// is not positive.
pub fn percent_of_gross(
    value: Decimal,
    gross: Decimal,
) -> Option<Decimal> {
    if gross <= Decimal::ZERO {
        return None;
    }
    Some(
        (value / gross * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
    )
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
