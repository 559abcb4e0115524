//! Employee payroll taxes (FICA).
//!
//! Social Security is a flat rate up to the wage base. Medicare is a base
//! rate on all wages plus the Additional Medicare rate on wages above the
//! filing-status threshold. Both use gross wages; pre-tax benefits do not
//! reduce them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{min, non_negative};
use crate::models::{FilingStatus, PayrollTaxConstants};

/// The two FICA components, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaTaxes {
    pub social_security: Decimal,
    pub medicare: Decimal,
}

impl FicaTaxes {
    pub fn total(&self) -> Decimal {
        self.social_security + self.medicare
    }
}

/// Computes Social Security and Medicare on `gross_income`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::calculate_fica;
/// use tax_core::{AdditionalMedicareThresholds, FilingStatus, PayrollTaxConstants};
///
/// let constants = PayrollTaxConstants {
///     social_security_rate: dec!(0.062),
///     social_security_wage_base: dec!(177300),
///     medicare_rate: dec!(0.0145),
///     additional_medicare_rate: dec!(0.009),
///     additional_medicare_thresholds: AdditionalMedicareThresholds {
///         single: dec!(200000),
///         married_filing_jointly: dec!(250000),
///         married_filing_separately: dec!(125000),
///         head_of_household: dec!(200000),
///     },
/// };
///
/// let fica = calculate_fica(dec!(100000), FilingStatus::Single, &constants);
///
/// assert_eq!(fica.social_security, dec!(6200));
/// assert_eq!(fica.medicare, dec!(1450));
/// ```
pub fn calculate_fica(
    gross_income: Decimal,
    filing_status: FilingStatus,
    constants: &PayrollTaxConstants,
) -> FicaTaxes {
    let gross_income = non_negative(gross_income);

    let social_security =
        min(gross_income, constants.social_security_wage_base) * constants.social_security_rate;

    let mut medicare = gross_income * constants.medicare_rate;
    let threshold = constants
        .additional_medicare_thresholds
        .for_status(filing_status);
    if gross_income > threshold {
        medicare += (gross_income - threshold) * constants.additional_medicare_rate;
    }

    FicaTaxes {
        social_security,
        medicare,
    }
}
