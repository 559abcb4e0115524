use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::FilingStatus;

/// Income above which the Additional Medicare rate applies, per status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalMedicareThresholds {
    pub single: Decimal,
    pub married_filing_jointly: Decimal,
    pub married_filing_separately: Decimal,
    pub head_of_household: Decimal,
}

impl AdditionalMedicareThresholds {
    pub fn for_status(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::MarriedFilingJointly => self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => self.married_filing_separately,
            FilingStatus::HeadOfHousehold => self.head_of_household,
        }
    }
}

/// Employee-side FICA parameters for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTaxConstants {
    /// Employee Social Security rate (6.2% for 2025).
    pub social_security_rate: Decimal,

    /// Wages above this are not subject to Social Security tax.
    pub social_security_wage_base: Decimal,

    /// Employee Medicare rate on all wages (1.45%).
    pub medicare_rate: Decimal,

    /// Additional Medicare rate on wages above the status threshold (0.9%).
    pub additional_medicare_rate: Decimal,

    pub additional_medicare_thresholds: AdditionalMedicareThresholds,
}
