mod calculation_result;
mod filing_status;
mod jurisdiction;
mod payroll;
mod scenario;
mod sdi;
mod tax_bracket;
mod tax_tables;

pub use calculation_result::{CalculationResult, Convergence};
pub use filing_status::FilingStatus;
pub use jurisdiction::JurisdictionTaxData;
pub use payroll::{AdditionalMedicareThresholds, PayrollTaxConstants};
pub use scenario::{BenefitDeductions, NOT_APPLICABLE, ScenarioInput, work_city_from_label};
pub use sdi::{SdiRule, SdiTable};
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
pub use tax_tables::TaxTables;
