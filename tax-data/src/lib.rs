//! Tax table loading.
//!
//! Bracket schedules come from CSV, payroll and SDI rates from TOML. The
//! 2025 data set is embedded and used whenever no replacement file is given.

mod builtin;
mod loader;

pub use builtin::{BRACKETS_2025_CSV, RATES_2025_TOML, builtin_tables};
pub use loader::{BracketRecord, TaxTableLoader, TaxTableLoaderError};
