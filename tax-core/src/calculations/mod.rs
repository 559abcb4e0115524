//! Tax functions and the gross-up solver built on them.
//!
//! | Module        | Provides |
//! |---------------|----------|
//! | `bracket_tax` | Progressive tax on a bracket table |
//! | `fica`        | Social Security and Medicare |
//! | `sdi`         | State disability insurance |
//! | `solver`      | Damped fixed-point gross-up |
//! | `batch`       | Many scenarios, sequential or parallel |
//! | `common`      | Rounding and currency formatting |

mod batch;
mod bracket_tax;
pub mod common;
mod fica;
mod sdi;
mod solver;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{BatchReport, BatchRunner, ExecutionMode, ScenarioOutcome};
pub use bracket_tax::progressive_tax;
pub use fica::{FicaTaxes, calculate_fica};
pub use sdi::calculate_sdi;
pub use solver::{GrossIncomeSolver, SolverConfig, TaxBreakdown, ValidationError};
