//! Run configuration: an optional TOML file overlaid by command-line flags.
//!
//! ```toml
//! target_net = "100000"
//! filing_status = "MFJ"
//! parallel = true
//! format = "csv"
//! log_level = "warn"
//! brackets = "data/brackets_2026.csv"
//! rates = "data/rates_2026.toml"
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::{BenefitDeductions, FilingStatus, ScenarioInput, work_city_from_label};
use thiserror::Error;

use crate::cli::{Cli, InlineScenario};
use crate::utils::{ParseDecimalError, decimal_or_zero, parse_decimal};

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One result card per scenario.
    #[default]
    Table,
    /// One CSV row per successful scenario.
    Csv,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("desired net income is required (--net or target_net)")]
    MissingTarget,

    #[error("desired net income: {0}")]
    InvalidTarget(#[from] ParseDecimalError),

    #[error("unknown filing status '{0}' (expected S, MFJ, MFS or HOH)")]
    UnknownFilingStatus(String),

    #[error("no scenario given (use --scenarios or --work-state)")]
    NoScenario,
}

/// Contents of a run configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub target_net: Option<Decimal>,
    pub filing_status: Option<String>,
    pub parallel: Option<bool>,
    pub format: Option<OutputFormat>,
    pub log_level: Option<String>,
    pub brackets: Option<PathBuf>,
    pub rates: Option<PathBuf>,
}

impl RunConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Where the scenarios for a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioSource {
    File(PathBuf),
    Inline(ScenarioInput),
}

/// Everything a run needs, after merging the config file and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub target_net: Decimal,
    pub filing_status: FilingStatus,
    pub parallel: bool,
    pub format: OutputFormat,
    pub brackets: Option<PathBuf>,
    pub rates: Option<PathBuf>,
    pub scenarios: ScenarioSource,
}

impl Settings {
    /// Command-line values win over file values; the filing status falls
    /// back to single.
    pub fn resolve(
        cli: &Cli,
        file: RunConfig,
    ) -> Result<Self, ConfigError> {
        let target_net = match cli.net.as_deref() {
            Some(net) => parse_decimal(net)?,
            None => file.target_net.ok_or(ConfigError::MissingTarget)?,
        };

        let filing_status = match cli.filing_status.as_deref().or(file.filing_status.as_deref()) {
            Some(status) => FilingStatus::parse(status)
                .ok_or_else(|| ConfigError::UnknownFilingStatus(status.to_string()))?,
            None => FilingStatus::Single,
        };

        let scenarios = match (&cli.scenarios, inline_scenario(&cli.inline)) {
            (Some(path), _) => ScenarioSource::File(path.clone()),
            (None, Some(scenario)) => ScenarioSource::Inline(scenario),
            (None, None) => return Err(ConfigError::NoScenario),
        };

        Ok(Self {
            target_net,
            filing_status,
            parallel: execution_flag(cli).or(file.parallel).unwrap_or(false),
            format: cli.format.or(file.format).unwrap_or_default(),
            brackets: cli.brackets.clone().or(file.brackets),
            rates: cli.rates.clone().or(file.rates),
            scenarios,
        })
    }
}

fn execution_flag(cli: &Cli) -> Option<bool> {
    match (cli.parallel, cli.sequential) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Log filter to use: flag first, then the config file.
pub fn log_level<'a>(
    cli: &'a Cli,
    file: &'a RunConfig,
) -> Option<&'a str> {
    cli.log_level.as_deref().or(file.log_level.as_deref())
}

fn inline_scenario(inline: &InlineScenario) -> Option<ScenarioInput> {
    let work_state = inline.work_state.as_deref()?.trim().to_ascii_uppercase();
    let residence_state = inline
        .residence_state
        .as_deref()
        .map(|state| state.trim().to_ascii_uppercase())
        .unwrap_or_else(|| work_state.clone());

    let amount = |field: &str, value: &Option<String>| {
        value
            .as_deref()
            .map_or(Decimal::ZERO, |v| decimal_or_zero(field, v))
    };

    Some(ScenarioInput {
        work_state,
        residence_state,
        work_city: inline.work_city.as_deref().and_then(work_city_from_label),
        benefits: BenefitDeductions {
            health: amount("health", &inline.health),
            dental_vision: amount("dental_vision", &inline.dental_vision),
            hsa: amount("hsa", &inline.hsa),
            fsa: amount("fsa", &inline.fsa),
            retirement: amount("retirement", &inline.retirement),
            other: amount("other", &inline.other),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gross-up").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn run_config_parses_every_key() {
        let config: RunConfig = toml::from_str(
            r#"
target_net = "85000"
filing_status = "MFJ"
parallel = true
format = "csv"
log_level = "debug"
brackets = "b.csv"
rates = "r.toml"
"#,
        )
        .expect("valid config");

        assert_eq!(
            config,
            RunConfig {
                target_net: Some(dec!(85000)),
                filing_status: Some("MFJ".to_string()),
                parallel: Some(true),
                format: Some(OutputFormat::Csv),
                log_level: Some("debug".to_string()),
                brackets: Some(PathBuf::from("b.csv")),
                rates: Some(PathBuf::from("r.toml")),
            }
        );
    }

    #[test]
    fn run_config_rejects_unknown_keys() {
        assert!(toml::from_str::<RunConfig>("target = 5").is_err());
    }

    #[test]
    fn flags_override_file() {
        let file = RunConfig {
            target_net: Some(dec!(50000)),
            filing_status: Some("MFJ".to_string()),
            format: Some(OutputFormat::Csv),
            ..Default::default()
        };
        let cli = cli(&["--net", "$70,000", "--filing-status", "HOH", "--format", "table", "--work-state", "TX"]);

        let settings = Settings::resolve(&cli, file).expect("resolves");

        assert_eq!(settings.target_net, dec!(70000));
        assert_eq!(settings.filing_status, FilingStatus::HeadOfHousehold);
        assert_eq!(settings.format, OutputFormat::Table);
    }

    #[test]
    fn file_fills_missing_flags() {
        let file = RunConfig {
            target_net: Some(dec!(50000)),
            filing_status: Some("married_filing_separately".to_string()),
            parallel: Some(true),
            brackets: Some(PathBuf::from("alt.csv")),
            ..Default::default()
        };

        let settings = Settings::resolve(&cli(&["--work-state", "TX"]), file).expect("resolves");

        assert_eq!(settings.target_net, dec!(50000));
        assert_eq!(settings.filing_status, FilingStatus::MarriedFilingSeparately);
        assert!(settings.parallel);
        assert_eq!(settings.format, OutputFormat::Table);
        assert_eq!(settings.brackets, Some(PathBuf::from("alt.csv")));
        assert_eq!(settings.rates, None);
    }

    #[test]
    fn sequential_flag_overrides_parallel_file() {
        let file = RunConfig {
            target_net: Some(dec!(50000)),
            parallel: Some(true),
            ..Default::default()
        };

        let settings = Settings::resolve(&cli(&["--sequential", "--work-state", "TX"]), file).expect("resolves");

        assert!(!settings.parallel);
    }

    #[test]
    fn parallel_flag_overrides_sequential_file() {
        let file = RunConfig {
            target_net: Some(dec!(50000)),
            parallel: Some(false),
            ..Default::default()
        };

        let settings = Settings::resolve(&cli(&["--parallel", "--work-state", "TX"]), file).expect("resolves");

        assert!(settings.parallel);
    }

    #[test]
    fn missing_target_is_an_error() {
        let err = Settings::resolve(&cli(&["--work-state", "TX"]), RunConfig::default())
            .expect_err("no target");

        assert!(matches!(err, ConfigError::MissingTarget));
    }

    #[test]
    fn malformed_target_is_an_error() {
        let err = Settings::resolve(&cli(&["--net", "lots", "--work-state", "TX"]), RunConfig::default())
            .expect_err("bad target");

        assert!(matches!(err, ConfigError::InvalidTarget(_)));
    }

    #[test]
    fn unknown_filing_status_is_an_error() {
        let err = Settings::resolve(
            &cli(&["--net", "1", "--filing-status", "QSS", "--work-state", "TX"]),
            RunConfig::default(),
        )
        .expect_err("QSS unsupported");

        assert!(matches!(err, ConfigError::UnknownFilingStatus(ref s) if s == "QSS"));
    }

    #[test]
    fn scenario_is_required() {
        let err = Settings::resolve(&cli(&["--net", "1"]), RunConfig::default())
            .expect_err("no scenario");

        assert!(matches!(err, ConfigError::NoScenario));
    }

    #[test]
    fn inline_scenario_defaults_residence_to_work_state() {
        let settings = Settings::resolve(
            &cli(&["--net", "80000", "--work-state", "ny", "--work-city", "NYC", "--retirement", "$5,000"]),
            RunConfig::default(),
        )
        .expect("resolves");

        let expected = ScenarioInput::new("NY", "NY")
            .with_city("NYC")
            .with_benefits(BenefitDeductions {
                retirement: dec!(5000),
                ..Default::default()
            });
        assert_eq!(settings.scenarios, ScenarioSource::Inline(expected));
    }

    #[test]
    fn scenario_file_wins_over_inline_flags() {
        let settings = Settings::resolve(
            &cli(&["--net", "80000", "--scenarios", "s.csv", "--work-state", "TX"]),
            RunConfig::default(),
        )
        .expect("resolves");

        assert_eq!(settings.scenarios, ScenarioSource::File(PathBuf::from("s.csv")));
    }

    #[test]
    fn log_level_prefers_flag() {
        let file = RunConfig {
            log_level: Some("warn".to_string()),
            ..Default::default()
        };

        assert_eq!(log_level(&cli(&[]), &file), Some("warn"));
        assert_eq!(log_level(&cli(&["--log-level", "trace"]), &file), Some("trace"));
    }
}
