use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Text used by front ends when a scenario has no work city.
pub const NOT_APPLICABLE: &str = "N/A";

/// Annual pre-tax benefit deductions.
///
/// These reduce the income-tax base but not the payroll-tax base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitDeductions {
    pub health: Decimal,
    pub dental_vision: Decimal,
    pub hsa: Decimal,
    pub fsa: Decimal,
    pub retirement: Decimal,
    pub other: Decimal,
}

impl BenefitDeductions {
    pub fn total(&self) -> Decimal {
        self.health + self.dental_vision + self.hsa + self.fsa + self.retirement + self.other
    }

    /// Named amounts, in display order.
    pub fn items(&self) -> [(&'static str, Decimal); 6] {
        [
            ("health", self.health),
            ("dental_vision", self.dental_vision),
            ("hsa", self.hsa),
            ("fsa", self.fsa),
            ("retirement", self.retirement),
            ("other", self.other),
        ]
    }
}

/// One employment / residency scenario to gross up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub work_state: String,
    pub residence_state: String,
    pub work_city: Option<String>,
    pub benefits: BenefitDeductions,
}

impl ScenarioInput {
    pub fn new(
        work_state: &str,
        residence_state: &str,
    ) -> Self {
        Self {
            work_state: work_state.to_string(),
            residence_state: residence_state.to_string(),
            ..Default::default()
        }
    }

    pub fn with_city(
        mut self,
        city: &str,
    ) -> Self {
        self.work_city = work_city_from_label(city);
        self
    }

    pub fn with_benefits(
        mut self,
        benefits: BenefitDeductions,
    ) -> Self {
        self.benefits = benefits;
        self
    }

    pub fn lives_out_of_state(&self) -> bool {
        self.work_state != self.residence_state
    }
}

/// Maps a front-end city label to an optional city. Blank and `N/A` mean none.
pub fn work_city_from_label(label: &str) -> Option<String> {
    let label = label.trim();
    if label.is_empty() || label.eq_ignore_ascii_case(NOT_APPLICABLE) {
        None
    } else {
        Some(label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn total_sums_all_six_deductions() {
        let benefits = BenefitDeductions {
            health: dec!(1200),
            dental_vision: dec!(300.50),
            hsa: dec!(4150),
            fsa: dec!(500),
            retirement: dec!(23000),
            other: dec!(49.50),
        };

        assert_eq!(benefits.total(), dec!(29200.00));
    }

    #[test]
    fn default_benefits_total_zero() {
        assert_eq!(BenefitDeductions::default().total(), Decimal::ZERO);
    }

    #[test]
    fn city_label_not_applicable_means_none() {
        assert_eq!(work_city_from_label("N/A"), None);
        assert_eq!(work_city_from_label("n/a"), None);
        assert_eq!(work_city_from_label("   "), None);
        assert_eq!(work_city_from_label(" NYC "), Some("NYC".to_string()));
    }

    #[test]
    fn builder_sets_city_and_benefits() {
        let scenario = ScenarioInput::new("NY", "NJ")
            .with_city("NYC")
            .with_benefits(BenefitDeductions {
                hsa: dec!(1000),
                ..Default::default()
            });

        assert_eq!(scenario.work_city.as_deref(), Some("NYC"));
        assert_eq!(scenario.benefits.total(), dec!(1000));
        assert!(scenario.lives_out_of_state());
    }
}
