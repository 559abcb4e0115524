//! The 2025 tables compiled into the crate.

use tax_core::TaxTables;

use crate::loader::{TaxTableLoader, TaxTableLoaderError};

/// Federal, state and city brackets for tax year 2025.
pub const BRACKETS_2025_CSV: &str = include_str!("../data/brackets_2025.csv");

/// FICA constants and state SDI rules for tax year 2025.
pub const RATES_2025_TOML: &str = include_str!("../data/rates_2025.toml");

/// Parses the embedded 2025 data set.
pub fn builtin_tables() -> Result<TaxTables, TaxTableLoaderError> {
    TaxTableLoader::load_from_str(BRACKETS_2025_CSV, RATES_2025_TOML)
}
