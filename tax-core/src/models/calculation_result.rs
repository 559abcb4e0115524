use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the solver finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Convergence {
    /// Whether `|net - target|` reached the tolerance within the budget.
    ///
    /// Judged on the unrounded guess; [`Convergence::residual`] is measured
    /// after rounding the gross to cents and can differ from it by that
    /// rounding.
    pub converged: bool,

    /// Iterations actually run.
    pub iterations: u32,

    /// `net_income - target` at the reported gross, rounded to cents.
    pub residual: Decimal,

    pub tolerance: Decimal,
}

/// Outcome of grossing up one scenario. Monetary fields are rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub scenario_id: usize,
    pub gross_pretax_income: Decimal,
    pub federal_tax: Decimal,
    pub state_tax_work: Decimal,
    pub state_tax_residence: Decimal,
    pub city_tax: Decimal,
    pub social_security_tax: Decimal,
    pub medicare_tax: Decimal,
    pub sdi_tax: Decimal,
    pub total_benefit_deductions: Decimal,
    pub total_tax: Decimal,
    pub net_income: Decimal,
    pub work_state: String,
    pub residence_state: String,
    pub post_tax_target: Decimal,
    pub convergence: Convergence,
}

impl CalculationResult {
    pub fn converged(&self) -> bool {
        self.convergence.converged
    }

    /// `net_income - post_tax_target`.
    pub fn net_difference(&self) -> Decimal {
        self.net_income - self.post_tax_target
    }
}
