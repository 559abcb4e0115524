use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    BracketTable, BracketTableError, FilingStatus, JurisdictionTaxData, PayrollTaxConstants,
    SdiTable, TaxBracket, TaxTables,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when loading tax tables.
#[derive(Debug, Error)]
pub enum TaxTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("rates parse error: {0}")]
    RatesParse(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unknown jurisdiction '{kind}' on row {row} (expected federal, state or city)")]
    UnknownJurisdiction { kind: String, row: usize },

    #[error("unknown filing status '{status}' on row {row}")]
    UnknownFilingStatus { status: String, row: usize },

    #[error("row {row}: {jurisdiction} bracket needs a state code")]
    MissingStateCode { jurisdiction: String, row: usize },

    #[error("row {row}: city bracket needs a city name")]
    MissingCityName { row: usize },

    #[error("row {row}: bracket with an upper bound needs a rate")]
    MissingRate { row: usize },

    #[error("invalid bracket table {table}: {source}")]
    InvalidTable {
        table: String,
        source: BracketTableError,
    },

    #[error("no federal bracket table for filing status {0}")]
    MissingFederalTable(FilingStatus),
}

impl From<csv::Error> for TaxTableLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxTableLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for TaxTableLoaderError {
    fn from(err: toml::de::Error) -> Self {
        TaxTableLoaderError::RatesParse(err.to_string())
    }
}

/// A single record from the bracket CSV file.
///
/// - `jurisdiction`: `federal`, `state` or `city`
/// - `state`: two-letter code, empty for federal rows
/// - `name`: filing status for federal rows, city name for city rows
/// - `rate`: marginal rate as a fraction (e.g., 0.0307)
/// - `max_income`: bracket upper bound; empty, `inf` or `unbounded` for the top bracket
///
/// A row with neither rate nor bound declares a jurisdiction with no income tax.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub jurisdiction: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub rate: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_upper_bound")]
    pub max_income: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn deserialize_upper_bound<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("unbounded") => {
            Ok(None)
        }
        Some(s) => s
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Layout of the rates TOML file.
#[derive(Debug, Deserialize)]
struct RatesFile {
    payroll: PayrollTaxConstants,
    #[serde(default)]
    sdi: SdiTable,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum TableKey {
    Federal(FilingStatus),
    State(String),
    City(String, String),
}

impl TableKey {
    fn describe(&self) -> String {
        match self {
            TableKey::Federal(status) => format!("federal/{}", status.as_str()),
            TableKey::State(state) => format!("state/{state}"),
            TableKey::City(state, city) => format!("city/{state}/{city}"),
        }
    }
}

/// Loader for bracket tables (CSV) and payroll/SDI rates (TOML).
///
/// Rows for the same table are collected in file order; the resulting
/// tables are validated by [`BracketTable::new`].
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, TaxTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into federal, state and city tables.
    ///
    /// Every filing status must have a federal table. Tables whose brackets
    /// continue past the first unbounded bracket, or that have no unbounded
    /// bracket at all, load with a warning.
    pub fn build_jurisdictions(
        records: &[BracketRecord]
    ) -> Result<JurisdictionTaxData, TaxTableLoaderError> {
        let mut groups: BTreeMap<TableKey, Vec<TaxBracket>> = BTreeMap::new();

        for (idx, record) in records.iter().enumerate() {
            // header is row 1
            let row = idx + 2;
            let key = Self::table_key(record, row)?;
            let brackets = groups.entry(key).or_default();

            match (record.rate, record.max_income) {
                (Some(rate), max_income) => brackets.push(TaxBracket { rate, max_income }),
                (None, None) => {}
                (None, Some(_)) => return Err(TaxTableLoaderError::MissingRate { row }),
            }
        }

        let mut data = JurisdictionTaxData::new();
        for (key, brackets) in groups {
            let table = BracketTable::new(brackets).map_err(|source| {
                TaxTableLoaderError::InvalidTable {
                    table: key.describe(),
                    source,
                }
            })?;
            match key {
                TableKey::Federal(status) => data.insert_federal(status, table),
                TableKey::State(state) => data.insert_state(&state, table),
                TableKey::City(state, city) => data.insert_city(&state, &city, table),
            }
        }

        for status in FilingStatus::all() {
            if data.federal(*status).is_none() {
                return Err(TaxTableLoaderError::MissingFederalTable(*status));
            }
        }

        warn_suspicious_tables(&data);
        Ok(data)
    }

    /// Parse payroll constants and SDI rules from TOML text.
    pub fn parse_rates(
        input: &str
    ) -> Result<(PayrollTaxConstants, SdiTable), TaxTableLoaderError> {
        let rates: RatesFile = toml::from_str(input)?;
        debug!(sdi_states = rates.sdi.states().count(), "parsed payroll and SDI rates");
        Ok((rates.payroll, rates.sdi))
    }

    /// Build a complete table set from bracket CSV text and rates TOML text.
    pub fn load_from_str(
        brackets_csv: &str,
        rates_toml: &str,
    ) -> Result<TaxTables, TaxTableLoaderError> {
        let records = Self::parse_brackets(brackets_csv.as_bytes())?;
        let jurisdictions = Self::build_jurisdictions(&records)?;
        let (payroll, sdi) = Self::parse_rates(rates_toml)?;

        debug!(
            records = records.len(),
            states = jurisdictions.state_codes().count(),
            "loaded tax tables"
        );

        Ok(TaxTables {
            jurisdictions,
            payroll,
            sdi,
        })
    }

    /// Like [`TaxTableLoader::load_from_str`], reading either input from
    /// disk when a path is given and falling back to the built-in 2025 data.
    pub fn load_from_files(
        brackets: Option<&Path>,
        rates: Option<&Path>,
    ) -> Result<TaxTables, TaxTableLoaderError> {
        let brackets_csv = match brackets {
            Some(path) => read_file(path)?,
            None => crate::builtin::BRACKETS_2025_CSV.to_string(),
        };
        let rates_toml = match rates {
            Some(path) => read_file(path)?,
            None => crate::builtin::RATES_2025_TOML.to_string(),
        };
        Self::load_from_str(&brackets_csv, &rates_toml)
    }

    fn table_key(
        record: &BracketRecord,
        row: usize,
    ) -> Result<TableKey, TaxTableLoaderError> {
        let state = record.state.trim().to_ascii_uppercase();
        let require_state = |jurisdiction: &str| {
            if state.is_empty() {
                Err(TaxTableLoaderError::MissingStateCode {
                    jurisdiction: jurisdiction.to_string(),
                    row,
                })
            } else {
                Ok(state.clone())
            }
        };

        match record.jurisdiction.trim().to_ascii_lowercase().as_str() {
            "federal" => FilingStatus::parse(&record.name)
                .map(TableKey::Federal)
                .ok_or_else(|| TaxTableLoaderError::UnknownFilingStatus {
                    status: record.name.clone(),
                    row,
                }),
            "state" => require_state("state").map(TableKey::State),
            "city" => {
                let state = require_state("city")?;
                let city = record.name.trim();
                if city.is_empty() {
                    return Err(TaxTableLoaderError::MissingCityName { row });
                }
                Ok(TableKey::City(state, city.to_string()))
            }
            _ => Err(TaxTableLoaderError::UnknownJurisdiction {
                kind: record.jurisdiction.clone(),
                row,
            }),
        }
    }
}

fn read_file(path: &Path) -> Result<String, TaxTableLoaderError> {
    std::fs::read_to_string(path).map_err(|source| TaxTableLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn warn_suspicious_tables(data: &JurisdictionTaxData) {
    for (name, table) in data.tables() {
        let dead = table.dead_brackets();
        if !dead.is_empty() {
            warn!(
                table = %name,
                ignored = dead.len(),
                "brackets after the first unbounded bracket are never applied"
            );
        }
        if table.is_capped() {
            warn!(table = %name, "no unbounded bracket; income above the last bound is untaxed");
        }
    }
}
