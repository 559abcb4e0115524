//! Runs the solver over many scenarios that share a target and filing status.
//!
//! Scenarios are independent: a failure in one is logged and recorded
//! without touching the others, and the parallel mode produces the same
//! outcomes in the same order as the sequential one.

use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::{error, info};

use crate::calculations::solver::{GrossIncomeSolver, ValidationError};
use crate::models::{CalculationResult, FilingStatus, ScenarioInput};

/// How a batch distributes work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

/// Outcome for one scenario, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    pub scenario_id: usize,
    pub result: Result<CalculationResult, ValidationError>,
}

/// Outcomes for a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = &CalculationResult> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &ValidationError)> {
        self.outcomes.iter().filter_map(|outcome| {
            outcome
                .result
                .as_ref()
                .err()
                .map(|err| (outcome.scenario_id, err))
        })
    }

    /// Successful results that ran out of iterations.
    pub fn non_converged(&self) -> impl Iterator<Item = &CalculationResult> {
        self.successes().filter(|result| !result.converged())
    }
}

/// Batch front for a [`GrossIncomeSolver`].
#[derive(Debug, Clone)]
pub struct BatchRunner<'a> {
    solver: GrossIncomeSolver<'a>,
    mode: ExecutionMode,
}

impl<'a> BatchRunner<'a> {
    pub fn new(solver: GrossIncomeSolver<'a>) -> Self {
        Self {
            solver,
            mode: ExecutionMode::default(),
        }
    }

    pub fn with_mode(
        mut self,
        mode: ExecutionMode,
    ) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Solves every scenario. Ids are positions in `scenarios`.
    pub fn run(
        &self,
        target_net: Decimal,
        scenarios: &[ScenarioInput],
        filing_status: FilingStatus,
    ) -> BatchReport {
        info!(
            scenarios = scenarios.len(),
            mode = ?self.mode,
            %target_net,
            %filing_status,
            "running scenario batch"
        );

        let solve = |(scenario_id, input): (usize, &ScenarioInput)| {
            self.solve_one(scenario_id, target_net, input, filing_status)
        };

        let outcomes = match self.mode {
            ExecutionMode::Sequential => scenarios.iter().enumerate().map(solve).collect(),
            ExecutionMode::Parallel => scenarios.par_iter().enumerate().map(solve).collect(),
        };

        BatchReport { outcomes }
    }

    fn solve_one(
        &self,
        scenario_id: usize,
        target_net: Decimal,
        input: &ScenarioInput,
        filing_status: FilingStatus,
    ) -> ScenarioOutcome {
        let result = self
            .solver
            .solve_scenario(scenario_id, target_net, input, filing_status);
        if let Err(err) = &result {
            error!(scenario_id, %err, "scenario rejected");
        }
        ScenarioOutcome {
            scenario_id,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::SolverConfig;
    use crate::calculations::test_support::tables;
    use crate::models::BenefitDeductions;

    fn scenarios() -> Vec<ScenarioInput> {
        vec![
            ScenarioInput::new("TX", "TX"),
            ScenarioInput::new("CA", "CA"),
            ScenarioInput::new("", "NY"),
            ScenarioInput::new("NY", "NJ").with_city("NYC"),
            ScenarioInput::new("PA", "NY").with_benefits(BenefitDeductions {
                health: dec!(3000),
                ..Default::default()
            }),
        ]
    }

    #[test]
    fn ids_follow_input_order() {
        let tables = tables();
        let runner = BatchRunner::new(GrossIncomeSolver::new(&tables));

        let report = runner.run(dec!(80000), &scenarios(), FilingStatus::Single);

        let ids: Vec<usize> = report.outcomes.iter().map(|o| o.scenario_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        for outcome in &report.outcomes {
            if let Ok(result) = &outcome.result {
                assert_eq!(result.scenario_id, outcome.scenario_id);
            }
        }
    }

    #[test]
    fn failure_does_not_abort_siblings() {
        let tables = tables();
        let runner = BatchRunner::new(GrossIncomeSolver::new(&tables));

        let report = runner.run(dec!(80000), &scenarios(), FilingStatus::Single);

        assert_eq!(report.len(), 5);
        assert_eq!(report.successes().count(), 4);
        let failures: Vec<(usize, &ValidationError)> = report.failures().collect();
        assert_eq!(failures, vec![(2, &ValidationError::MissingWorkState)]);
    }

    #[test]
    fn scenario_alone_matches_scenario_in_batch() {
        let tables = tables();
        let solver = GrossIncomeSolver::new(&tables);
        let runner = BatchRunner::new(solver.clone());
        let scenarios = scenarios();

        let report = runner.run(dec!(80000), &scenarios, FilingStatus::Single);
        let alone = solver.solve_scenario(3, dec!(80000), &scenarios[3], FilingStatus::Single);

        assert_eq!(report.outcomes[3].result, alone);
    }

    #[test]
    fn parallel_matches_sequential() {
        let tables = tables();
        let solver = GrossIncomeSolver::new(&tables);
        let scenarios = scenarios();

        let sequential = BatchRunner::new(solver.clone()).run(
            dec!(95000),
            &scenarios,
            FilingStatus::Single,
        );
        let parallel = BatchRunner::new(solver)
            .with_mode(ExecutionMode::Parallel)
            .run(dec!(95000), &scenarios, FilingStatus::Single);

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn non_converged_lists_exhausted_scenarios() {
        let tables = tables();
        let config = SolverConfig {
            max_iterations: 2,
            ..SolverConfig::default()
        };
        let runner = BatchRunner::new(GrossIncomeSolver::with_config(&tables, config));

        let report = runner.run(dec!(80000), &scenarios(), FilingStatus::Single);

        assert_eq!(report.non_converged().count(), 4);
    }

    #[test]
    fn empty_batch_is_empty_report() {
        let tables = tables();
        let runner = BatchRunner::new(GrossIncomeSolver::new(&tables));

        let report = runner.run(dec!(80000), &[], FilingStatus::Single);

        assert!(report.is_empty());
    }
}
