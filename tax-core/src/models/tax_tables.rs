use crate::models::{JurisdictionTaxData, PayrollTaxConstants, SdiTable};

/// Everything the solver reads: bracket schedules, FICA constants and SDI
/// rules. Loaded once and passed around by shared reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTables {
    pub jurisdictions: JurisdictionTaxData,
    pub payroll: PayrollTaxConstants,
    pub sdi: SdiTable,
}
