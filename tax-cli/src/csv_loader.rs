//! CSV loader for scenario input data.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive.
//!
//! | Column            | Required | Notes |
//! |-------------------|----------|-------|
//! | `work_state`      | yes      | Two-letter code, e.g. `NY` |
//! | `residence_state` | yes      | Two-letter code |
//! | `work_city`       | yes      | City with its own schedule; empty or `N/A` for none |
//! | `health`          | no       | Annual pre-tax amount |
//! | `dental_vision`   | no       | |
//! | `hsa`             | no       | |
//! | `fsa`             | no       | |
//! | `retirement`      | no       | 401(k) and similar |
//! | `other`           | no       | |
//!
//! Amounts may carry `$` and thousands separators. A malformed amount is
//! logged and read as 0.
//!
//! ### Example
//!
//! ```csv
//! work_state,residence_state,work_city,health,retirement
//! NY,NJ,NYC,"$2,400",6000
//! CA,CA,N/A,,
//! ```
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::{BenefitDeductions, ScenarioInput, work_city_from_label};

use crate::utils::decimal_or_zero;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    work_state: String,
    residence_state: String,
    work_city: String,
    #[serde(default)]
    health: String,
    #[serde(default)]
    dental_vision: String,
    #[serde(default)]
    hsa: String,
    #[serde(default)]
    fsa: String,
    #[serde(default)]
    retirement: String,
    #[serde(default)]
    other: String,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading scenario CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(row: CsvRow) -> ScenarioInput {
    let benefits = BenefitDeductions {
        health: decimal_or_zero("health", &row.health),
        dental_vision: decimal_or_zero("dental_vision", &row.dental_vision),
        hsa: decimal_or_zero("hsa", &row.hsa),
        fsa: decimal_or_zero("fsa", &row.fsa),
        retirement: decimal_or_zero("retirement", &row.retirement),
        other: decimal_or_zero("other", &row.other),
    };

    ScenarioInput {
        work_state: row.work_state.to_ascii_uppercase(),
        residence_state: row.residence_state.to_ascii_uppercase(),
        work_city: work_city_from_label(&row.work_city),
        benefits,
    }
}

/// Parse CSV text and return the scenarios in file order.
///
/// State codes are upper-cased. Blank states are passed through so the
/// solver can reject that scenario alone.
///
/// # Errors
///
/// [`CsvLoadError::Parse`] if the CSV is structurally invalid or a required
/// column is missing.
pub fn load_from_str(input: &str) -> Result<Vec<ScenarioInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .map(|result| Ok(convert_row(result?)))
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<ScenarioInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
