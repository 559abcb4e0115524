//! Progressive (marginal) bracket taxation.
//!
//! Only the income that falls inside a bracket is taxed at that bracket's
//! rate. The walk stops at the first unbounded bracket, so any brackets listed
//! after it in a table are never applied.

use rust_decimal::Decimal;

use crate::calculations::common::{min, non_negative};
use crate::models::BracketTable;

/// Tax owed on `taxable_income` under `table`.
///
/// Returns zero for an empty table or a non-positive income.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::progressive_tax;
/// use tax_core::{BracketTable, TaxBracket};
///
/// let table = BracketTable::new(vec![
///     TaxBracket::bounded(dec!(0.02), dec!(500)),
///     TaxBracket::bounded(dec!(0.04), dec!(3000)),
///     TaxBracket::unbounded(dec!(0.05)),
/// ])
/// .unwrap();
///
/// // 500 × 2% + 2500 × 4% + 7000 × 5%
/// assert_eq!(progressive_tax(dec!(10000), &table), dec!(460.00));
/// ```
pub fn progressive_tax(
    taxable_income: Decimal,
    table: &BracketTable,
) -> Decimal {
    if table.is_empty() || taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    let mut lower_bound = Decimal::ZERO;

    for bracket in table {
        if taxable_income <= lower_bound {
            break;
        }

        let top = match bracket.max_income {
            Some(upper) => min(taxable_income, upper),
            None => taxable_income,
        };
        let in_bracket = top - lower_bound;
        if in_bracket > Decimal::ZERO {
            tax += in_bracket * bracket.rate;
        }

        match bracket.max_income {
            Some(upper) => lower_bound = upper,
            None => break,
        }
    }

    non_negative(tax)
}
