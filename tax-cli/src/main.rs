use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use tax_cli::cli::Cli;
use tax_cli::config::{OutputFormat, RunConfig, ScenarioSource, Settings, log_level};
use tax_cli::{csv_loader, logging, report};
use tax_core::calculations::{BatchRunner, ExecutionMode, GrossIncomeSolver};
use tax_data::TaxTableLoader;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };
    logging::init_logging(log_level(&cli, &file_config), cli.log_file.as_deref())?;

    if cli.list_states {
        let tables = TaxTableLoader::load_from_files(
            cli.brackets.as_deref().or(file_config.brackets.as_deref()),
            cli.rates.as_deref().or(file_config.rates.as_deref()),
        )
        .context("failed to load tax tables")?;
        print!("{}", report::states_listing(&tables.jurisdictions));
        return Ok(());
    }

    let settings = Settings::resolve(&cli, file_config)?;
    debug!(?settings, "resolved run settings");

    let tables = TaxTableLoader::load_from_files(settings.brackets.as_deref(), settings.rates.as_deref())
        .context("failed to load tax tables")?;

    let scenarios = match &settings.scenarios {
        ScenarioSource::File(path) => csv_loader::load_from_file(path)
            .with_context(|| format!("failed to load scenarios from {}", path.display()))?,
        ScenarioSource::Inline(scenario) => vec![scenario.clone()],
    };
    info!(
        scenarios = scenarios.len(),
        target = %settings.target_net,
        filing_status = %settings.filing_status,
        "solving"
    );

    let mode = if settings.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    };
    let batch = BatchRunner::new(GrossIncomeSolver::new(&tables))
        .with_mode(mode)
        .run(settings.target_net, &scenarios, settings.filing_status);

    let stdout = io::stdout();
    match settings.format {
        OutputFormat::Table => {
            let mut out = stdout.lock();
            for outcome in &batch.outcomes {
                match &outcome.result {
                    Ok(result) => writeln!(out, "{}", report::result_card(result))?,
                    Err(err) => writeln!(out, "{}\n", report::failure_line(outcome.scenario_id, err))?,
                }
            }
        }
        OutputFormat::Csv => {
            report::write_csv(stdout.lock(), batch.successes()).context("failed to write CSV")?;
            for (scenario_id, err) in batch.failures() {
                warn!(scenario = scenario_id + 1, %err, "scenario skipped in CSV output");
            }
        }
    }

    let non_converged = batch.non_converged().count();
    if non_converged > 0 {
        warn!(non_converged, "some scenarios did not converge; figures are best estimates");
    }

    Ok(())
}
