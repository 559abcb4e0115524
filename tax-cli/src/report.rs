//! Text and CSV rendering of solver results.

use std::fmt::Write as _;
use std::io;

use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::calculations::ValidationError;
use tax_core::calculations::common::{format_currency, percent_of_gross};
use tax_core::{CalculationResult, JurisdictionTaxData};

const LABEL_WIDTH: usize = 24;
const AMOUNT_WIDTH: usize = 14;

/// Human-readable card for one scenario.
///
/// Residence, city and SDI lines appear only when non-zero. The last line
/// compares the achieved net with the target.
pub fn result_card(result: &CalculationResult) -> String {
    let gross = result.gross_pretax_income;
    let mut card = String::new();

    let _ = writeln!(
        card,
        "Scenario {} ({}/{})",
        result.scenario_id + 1,
        result.work_state,
        result.residence_state
    );

    let mut line = |label: &str, amount: Decimal| {
        let percent = percent_of_gross(amount, gross)
            .map(|p| format!("{p:.1}%"))
            .unwrap_or_default();
        let _ = writeln!(
            card,
            "  {label:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}{percent:>8}",
            format_currency(amount)
        );
    };

    line("Net Income", result.net_income);
    line("Federal Income Tax", result.federal_tax);
    line("Social Security Tax", result.social_security_tax);
    line("Medicare Tax", result.medicare_tax);
    line("State Tax (Work)", result.state_tax_work);
    if result.state_tax_residence > Decimal::ZERO {
        line("State Tax (Residence)", result.state_tax_residence);
    }
    if result.city_tax > Decimal::ZERO {
        line("City Tax", result.city_tax);
    }
    if result.sdi_tax > Decimal::ZERO {
        line("SDI/PFML Tax", result.sdi_tax);
    }
    line("Pre-Tax Benefits", result.total_benefit_deductions);
    line("Total Tax", result.total_tax);

    let _ = writeln!(
        card,
        "  {:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}",
        "Gross Pre-Tax Income",
        format_currency(gross)
    );
    let _ = writeln!(card, "  {}", net_check(result));
    card
}

/// `within tolerance` when the net lands inside the solver tolerance,
/// otherwise flagged with the miss and whether the solver converged.
pub fn net_check(result: &CalculationResult) -> String {
    let difference = result.net_difference();
    let tolerance = result.convergence.tolerance;
    let status = if difference.abs() <= tolerance {
        format!("within {} tolerance", format_currency(tolerance))
    } else if result.converged() {
        format!("OFF BY {}", format_currency(difference))
    } else {
        format!(
            "NOT CONVERGED after {} iterations, off by {}",
            result.convergence.iterations,
            format_currency(difference)
        )
    };
    format!(
        "Net {} vs target {}: {status}",
        format_currency(result.net_income),
        format_currency(result.post_tax_target)
    )
}

/// One-line message for a rejected scenario.
pub fn failure_line(
    scenario_id: usize,
    error: &ValidationError,
) -> String {
    format!("Scenario {} Error: {error}", scenario_id + 1)
}

/// Flat row for `--format csv`.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    scenario: usize,
    work_state: &'a str,
    residence_state: &'a str,
    target_net: Decimal,
    gross_pretax_income: Decimal,
    net_income: Decimal,
    federal_tax: Decimal,
    state_tax_work: Decimal,
    state_tax_residence: Decimal,
    city_tax: Decimal,
    social_security_tax: Decimal,
    medicare_tax: Decimal,
    sdi_tax: Decimal,
    total_benefit_deductions: Decimal,
    total_tax: Decimal,
    converged: bool,
    iterations: u32,
}

impl<'a> From<&'a CalculationResult> for ReportRow<'a> {
    fn from(result: &'a CalculationResult) -> Self {
        Self {
            scenario: result.scenario_id + 1,
            work_state: &result.work_state,
            residence_state: &result.residence_state,
            target_net: result.post_tax_target,
            gross_pretax_income: result.gross_pretax_income,
            net_income: result.net_income,
            federal_tax: result.federal_tax,
            state_tax_work: result.state_tax_work,
            state_tax_residence: result.state_tax_residence,
            city_tax: result.city_tax,
            social_security_tax: result.social_security_tax,
            medicare_tax: result.medicare_tax,
            sdi_tax: result.sdi_tax,
            total_benefit_deductions: result.total_benefit_deductions,
            total_tax: result.total_tax,
            converged: result.converged(),
            iterations: result.convergence.iterations,
        }
    }
}

/// Writes a header and one row per result.
pub fn write_csv<'a, W, I>(
    writer: W,
    results: I,
) -> Result<(), csv::Error>
where
    W: io::Write,
    I: IntoIterator<Item = &'a CalculationResult>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(ReportRow::from(result))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Known states, each followed by the cities that have their own schedule.
pub fn states_listing(jurisdictions: &JurisdictionTaxData) -> String {
    let mut listing = String::new();
    for state in jurisdictions.state_codes() {
        let cities = jurisdictions.cities_in(state);
        if cities.is_empty() {
            let _ = writeln!(listing, "{state}");
        } else {
            let _ = writeln!(listing, "{state}: {}", cities.join(", "));
        }
    }
    listing
}
