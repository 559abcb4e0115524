//! Gross-up solver: the pre-tax salary needed to take home a target net.
//!
//! Net income is a piecewise-linear function of gross income built from
//! several progressive schedules and capped payroll taxes, so it has no
//! closed-form inverse. The solver runs a damped fixed-point iteration:
//!
//! | Step | Description |
//! |------|-------------|
//! | 0    | Seed: `target + benefits + 40% × target` |
//! | 1    | FICA and SDI on the guess (gross wages) |
//! | 2    | Taxable income: `max(0, guess − benefits)` |
//! | 3    | Federal and work-state tax on taxable income |
//! | 4    | Residence-state tax less credit for work-state tax, floored at 0 |
//! | 5    | City tax on taxable income when the work city has a schedule |
//! | 6    | Net: `guess − total tax − benefits` |
//! | 7    | Stop when `|net − target| ≤ tolerance` |
//! | 8    | Otherwise `guess −= (net − target) × 0.7` and repeat |
//!
//! The budget is 150 iterations. Running out is not an error: the last guess
//! is reported with [`Convergence::converged`] set to `false`. A step whose
//! next guess would leave the representable range (possible only with an
//! unstable [`SolverConfig`]) ends the loop the same way.
//!
//! Targets and benefit amounts above [`MAX_AMOUNT`] are rejected up front.
//!
//! The final guess is rounded to cents and evaluated once more, so every
//! component in the [`CalculationResult`] is exactly what the tax functions
//! produce for the reported gross.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::GrossIncomeSolver;
//! use tax_core::{
//!     AdditionalMedicareThresholds, BracketTable, FilingStatus, JurisdictionTaxData,
//!     PayrollTaxConstants, ScenarioInput, SdiTable, TaxTables,
//! };
//!
//! let mut jurisdictions = JurisdictionTaxData::new();
//! jurisdictions.insert_federal(FilingStatus::Single, BracketTable::flat(dec!(0.10)));
//! jurisdictions.insert_state("TX", BracketTable::empty());
//!
//! let tables = TaxTables {
//!     jurisdictions,
//!     payroll: PayrollTaxConstants {
//!         social_security_rate: dec!(0.062),
//!         social_security_wage_base: dec!(177300),
//!         medicare_rate: dec!(0.0145),
//!         additional_medicare_rate: dec!(0.009),
//!         additional_medicare_thresholds: AdditionalMedicareThresholds {
//!             single: dec!(200000),
//!             married_filing_jointly: dec!(250000),
//!             married_filing_separately: dec!(125000),
//!             head_of_household: dec!(200000),
//!         },
//!     },
//!     sdi: SdiTable::new(),
//! };
//!
//! let solver = GrossIncomeSolver::new(&tables);
//! let result = solver
//!     .solve(dec!(50000), &ScenarioInput::new("TX", "TX"), FilingStatus::Single)
//!     .unwrap();
//!
//! assert!(result.converged());
//! assert!((result.net_income - dec!(50000)).abs() <= dec!(0.50));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::calculations::bracket_tax::progressive_tax;
use crate::calculations::common::{max, non_negative, round_half_up};
use crate::calculations::fica::calculate_fica;
use crate::calculations::sdi::calculate_sdi;
use crate::models::{CalculationResult, Convergence, FilingStatus, ScenarioInput, TaxTables};

/// Largest target or single benefit amount accepted (one quadrillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Guesses beyond this magnitude stop the iteration.
const MAX_GUESS: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// Reasons a scenario cannot be solved. Fatal to that scenario only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("work state must be selected")]
    MissingWorkState,

    #[error("residence state must be selected")]
    MissingResidenceState,

    #[error("desired net income must be positive, got {0}")]
    NonPositiveTarget(Decimal),

    #[error("benefit deduction '{field}' must not be negative, got {amount}")]
    NegativeBenefit { field: &'static str, amount: Decimal },

    #[error("desired net income {0} is too large to solve")]
    TargetOutOfRange(Decimal),

    #[error("benefit deduction '{field}' is too large, got {amount}")]
    BenefitOutOfRange { field: &'static str, amount: Decimal },
}

/// Iteration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub max_iterations: u32,

    /// Largest acceptable `|net − target|`.
    pub tolerance: Decimal,

    /// Fraction of the observed gap applied per step.
    pub adjustment_factor: Decimal,

    /// Effective tax rate assumed for the first guess.
    pub seed_tax_rate: Decimal,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 150,
            tolerance: Decimal::new(50, 2),
            adjustment_factor: Decimal::new(7, 1),
            seed_tax_rate: Decimal::new(40, 2),
        }
    }
}

/// Every component for one gross-income guess, at full precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub gross_income: Decimal,
    pub taxable_income: Decimal,
    pub federal_tax: Decimal,
    pub state_tax_work: Decimal,
    pub state_tax_residence: Decimal,
    pub city_tax: Decimal,
    pub social_security_tax: Decimal,
    pub medicare_tax: Decimal,
    pub sdi_tax: Decimal,
    pub benefit_deductions: Decimal,
}

impl TaxBreakdown {
    pub fn total_tax(&self) -> Decimal {
        self.federal_tax
            + self.state_tax_work
            + self.state_tax_residence
            + self.city_tax
            + self.social_security_tax
            + self.medicare_tax
            + self.sdi_tax
    }

    pub fn net_income(&self) -> Decimal {
        self.gross_income - self.total_tax() - self.benefit_deductions
    }
}

/// Finds the gross income that yields a target net income.
///
/// Holds only shared references to immutable tables, so one solver can be
/// used from many threads at once.
#[derive(Debug, Clone)]
pub struct GrossIncomeSolver<'a> {
    tables: &'a TaxTables,
    config: SolverConfig,
}

impl<'a> GrossIncomeSolver<'a> {
    /// Creates a solver with the default iteration parameters.
    pub fn new(tables: &'a TaxTables) -> Self {
        Self::with_config(tables, SolverConfig::default())
    }

    pub fn with_config(
        tables: &'a TaxTables,
        config: SolverConfig,
    ) -> Self {
        Self { tables, config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn tables(&self) -> &'a TaxTables {
        self.tables
    }

    /// Solves one scenario, reported as scenario 0.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if either state is blank, the target is
    /// not positive, or the target or a benefit deduction is out of range.
    pub fn solve(
        &self,
        target_net: Decimal,
        input: &ScenarioInput,
        filing_status: FilingStatus,
    ) -> Result<CalculationResult, ValidationError> {
        self.solve_scenario(0, target_net, input, filing_status)
    }

    /// Solves one scenario and tags the result with `scenario_id`.
    ///
    /// # Errors
    ///
    /// See [`GrossIncomeSolver::solve`].
    pub fn solve_scenario(
        &self,
        scenario_id: usize,
        target_net: Decimal,
        input: &ScenarioInput,
        filing_status: FilingStatus,
    ) -> Result<CalculationResult, ValidationError> {
        self.validate(target_net, input)?;
        self.warn_missing_tables(scenario_id, input, filing_status);

        let benefits = input.benefits.total();
        let mut guess = self
            .seed(target_net, benefits)
            .ok_or(ValidationError::TargetOutOfRange(target_net))?;
        let mut iterations = 0;
        let mut converged = false;
        let mut difference = Decimal::ZERO;

        while iterations < self.config.max_iterations {
            iterations += 1;
            guess = non_negative(guess);

            let breakdown = self.evaluate(guess, input, filing_status);
            difference = breakdown.net_income() - target_net;
            trace!(scenario_id, iterations, %guess, %difference, "gross-up step");

            if difference.abs() <= self.config.tolerance {
                converged = true;
                break;
            }

            match self.next_guess(guess, difference) {
                Some(next) => guess = next,
                None => {
                    warn!(scenario_id, iterations, %guess, %difference, "gross-up step left the representable range");
                    break;
                }
            }
        }

        if !converged {
            warn!(
                scenario_id,
                iterations,
                %difference,
                "failed to converge; reporting best available estimate"
            );
        }

        let gross = round_half_up(non_negative(guess));
        let breakdown = self.evaluate(gross, input, filing_status);
        let residual = round_half_up(breakdown.net_income() - target_net);

        debug!(
            scenario_id,
            iterations,
            converged,
            %gross,
            %residual,
            "gross-up finished"
        );

        Ok(self.to_result(
            scenario_id,
            &breakdown,
            input,
            target_net,
            Convergence {
                converged,
                iterations,
                residual,
                tolerance: self.config.tolerance,
            },
        ))
    }

    /// Computes every tax component for a single gross-income value.
    ///
    /// Payroll taxes and SDI use gross wages; income taxes, including the
    /// city tax, use gross less pre-tax benefits.
    pub fn evaluate(
        &self,
        gross_income: Decimal,
        input: &ScenarioInput,
        filing_status: FilingStatus,
    ) -> TaxBreakdown {
        let gross_income = non_negative(gross_income);
        let jurisdictions = &self.tables.jurisdictions;

        let fica = calculate_fica(gross_income, filing_status, &self.tables.payroll);
        let sdi_tax = calculate_sdi(gross_income, &input.work_state, &self.tables.sdi);

        let benefit_deductions = input.benefits.total();
        let taxable_income = max(Decimal::ZERO, gross_income - benefit_deductions);

        let federal_tax = jurisdictions
            .federal(filing_status)
            .map_or(Decimal::ZERO, |table| progressive_tax(taxable_income, table));
        let state_tax_work = jurisdictions
            .state(&input.work_state)
            .map_or(Decimal::ZERO, |table| progressive_tax(taxable_income, table));

        let state_tax_residence = if input.lives_out_of_state() {
            let potential = jurisdictions
                .state(&input.residence_state)
                .map_or(Decimal::ZERO, |table| progressive_tax(taxable_income, table));
            max(Decimal::ZERO, potential - state_tax_work)
        } else {
            Decimal::ZERO
        };

        let city_tax = input
            .work_city
            .as_deref()
            .and_then(|city| jurisdictions.city(&input.work_state, city))
            .map_or(Decimal::ZERO, |table| progressive_tax(taxable_income, table));

        TaxBreakdown {
            gross_income,
            taxable_income,
            federal_tax,
            state_tax_work,
            state_tax_residence,
            city_tax,
            social_security_tax: fica.social_security,
            medicare_tax: fica.medicare,
            sdi_tax,
            benefit_deductions,
        }
    }

    fn seed(
        &self,
        target_net: Decimal,
        benefits: Decimal,
    ) -> Option<Decimal> {
        target_net
            .checked_mul(self.config.seed_tax_rate)?
            .checked_add(target_net)?
            .checked_add(benefits)
            .filter(|seed| seed.abs() <= MAX_GUESS)
    }

    fn next_guess(
        &self,
        guess: Decimal,
        difference: Decimal,
    ) -> Option<Decimal> {
        difference
            .checked_mul(self.config.adjustment_factor)
            .and_then(|step| guess.checked_sub(step))
            .filter(|next| next.abs() <= MAX_GUESS)
    }

    fn validate(
        &self,
        target_net: Decimal,
        input: &ScenarioInput,
    ) -> Result<(), ValidationError> {
        if input.work_state.trim().is_empty() {
            return Err(ValidationError::MissingWorkState);
        }
        if input.residence_state.trim().is_empty() {
            return Err(ValidationError::MissingResidenceState);
        }
        if target_net <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveTarget(target_net));
        }
        if target_net > MAX_AMOUNT {
            return Err(ValidationError::TargetOutOfRange(target_net));
        }
        for (field, amount) in input.benefits.items() {
            if amount < Decimal::ZERO {
                return Err(ValidationError::NegativeBenefit { field, amount });
            }
            if amount > MAX_AMOUNT {
                return Err(ValidationError::BenefitOutOfRange { field, amount });
            }
        }
        Ok(())
    }

    fn warn_missing_tables(
        &self,
        scenario_id: usize,
        input: &ScenarioInput,
        filing_status: FilingStatus,
    ) {
        let jurisdictions = &self.tables.jurisdictions;
        if jurisdictions.federal(filing_status).is_none() {
            warn!(scenario_id, %filing_status, "no federal bracket table; federal tax is zero");
        }
        if !jurisdictions.has_state(&input.work_state) {
            warn!(scenario_id, state = %input.work_state, "no bracket table for work state; treating as no income tax");
        }
        if input.lives_out_of_state() && !jurisdictions.has_state(&input.residence_state) {
            warn!(scenario_id, state = %input.residence_state, "no bracket table for residence state; treating as no income tax");
        }
        if let Some(city) = input.work_city.as_deref() {
            if jurisdictions.city(&input.work_state, city).is_none() {
                debug!(scenario_id, city, work_state = %input.work_state, "no city schedule; city tax is zero");
            }
        }
    }

    fn to_result(
        &self,
        scenario_id: usize,
        breakdown: &TaxBreakdown,
        input: &ScenarioInput,
        target_net: Decimal,
        convergence: Convergence,
    ) -> CalculationResult {
        CalculationResult {
            scenario_id,
            gross_pretax_income: round_half_up(breakdown.gross_income),
            federal_tax: round_half_up(breakdown.federal_tax),
            state_tax_work: round_half_up(breakdown.state_tax_work),
            state_tax_residence: round_half_up(breakdown.state_tax_residence),
            city_tax: round_half_up(breakdown.city_tax),
            social_security_tax: round_half_up(breakdown.social_security_tax),
            medicare_tax: round_half_up(breakdown.medicare_tax),
            sdi_tax: round_half_up(breakdown.sdi_tax),
            total_benefit_deductions: round_half_up(breakdown.benefit_deductions),
            total_tax: round_half_up(breakdown.total_tax()),
            net_income: round_half_up(breakdown.net_income()),
            work_state: input.work_state.clone(),
            residence_state: input.residence_state.clone(),
            post_tax_target: target_net,
            convergence,
        }
    }
}
