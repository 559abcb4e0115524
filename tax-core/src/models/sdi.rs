use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a state computes its disability / paid-leave withholding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum SdiRule {
    /// `min(wages, wage_cap) × rate`, then limited to `contribution_cap`.
    /// Either cap may be absent.
    WageCapped {
        rate: Decimal,
        wage_cap: Option<Decimal>,
        contribution_cap: Option<Decimal>,
    },

    /// A fixed weekly deduction charged for all 52 weeks regardless of wages.
    /// `rate` is informational only.
    FlatWeekly {
        rate: Decimal,
        weekly_cap_amount: Decimal,
    },
}

/// SDI rules keyed by work-state code. States without an entry withhold nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SdiTable {
    rules: BTreeMap<String, SdiRule>,
}

impl SdiTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        state: &str,
        rule: SdiRule,
    ) {
        self.rules.insert(state.to_string(), rule);
    }

    pub fn get(
        &self,
        state: &str,
    ) -> Option<&SdiRule> {
        self.rules.get(state)
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl FromIterator<(String, SdiRule)> for SdiTable {
    fn from_iter<T: IntoIterator<Item = (String, SdiRule)>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
