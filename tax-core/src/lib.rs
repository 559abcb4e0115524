//! Net-to-gross salary estimation.
//!
//! [`models`] holds the bracket tables, payroll constants and scenario
//! records; [`calculations`] holds the tax functions and the
//! [`GrossIncomeSolver`](calculations::GrossIncomeSolver) that inverts them.

pub mod calculations;
pub mod models;

pub use models::*;
