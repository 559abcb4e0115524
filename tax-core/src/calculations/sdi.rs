//! State disability insurance / paid family leave withholding.

use rust_decimal::Decimal;
use tracing::trace;

use crate::calculations::common::{min, non_negative};
use crate::models::{SdiRule, SdiTable};

const WEEKS_PER_YEAR: Decimal = Decimal::from_parts(52, 0, 0, false, 0);

/// SDI withheld for a worker employed in `work_state`.
///
/// Computed on gross wages. States without a rule return zero.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::calculate_sdi;
/// use tax_core::{SdiRule, SdiTable};
///
/// let mut table = SdiTable::new();
/// table.insert(
///     "CA",
///     SdiRule::WageCapped {
///         rate: dec!(0.011),
///         wage_cap: Some(dec!(160174)),
///         contribution_cap: Some(dec!(1761.91)),
///     },
/// );
///
/// assert_eq!(calculate_sdi(dec!(100000), "CA", &table), dec!(1100));
/// assert_eq!(calculate_sdi(dec!(100000), "TX", &table), dec!(0));
/// ```
pub fn calculate_sdi(
    gross_income: Decimal,
    work_state: &str,
    table: &SdiTable,
) -> Decimal {
    let gross_income = non_negative(gross_income);

    let Some(rule) = table.get(work_state) else {
        return Decimal::ZERO;
    };

    let sdi = match rule {
        SdiRule::FlatWeekly {
            weekly_cap_amount, ..
        } => *weekly_cap_amount * WEEKS_PER_YEAR,
        SdiRule::WageCapped {
            rate,
            wage_cap,
            contribution_cap,
        } => {
            let taxable_wage = match wage_cap {
                Some(cap) => min(gross_income, *cap),
                None => gross_income,
            };
            let tax = taxable_wage * *rate;
            match contribution_cap {
                Some(cap) => min(tax, *cap),
                None => tax,
            }
        }
    };

    trace!(work_state, %gross_income, %sdi, "sdi");
    non_negative(sdi)
}
