use serde::{Deserialize, Serialize};

/// Federal filing status. Selects the federal bracket schedule and the
/// Additional Medicare threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    pub fn all() -> &'static [FilingStatus] {
        &[
            FilingStatus::Single,
            FilingStatus::MarriedFilingJointly,
            FilingStatus::MarriedFilingSeparately,
            FilingStatus::HeadOfHousehold,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
        }
    }

    /// Accepts the short code (`MFJ`), the snake-case name
    /// (`married_filing_jointly`) or the camel-case name used by older data
    /// files (`marriedJointly`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "S" | "single" => Some(Self::Single),
            "MFJ" | "married_filing_jointly" | "marriedJointly" => {
                Some(Self::MarriedFilingJointly)
            }
            "MFS" | "married_filing_separately" | "marriedSeparately" => {
                Some(Self::MarriedFilingSeparately)
            }
            "HOH" | "head_of_household" | "headOfHousehold" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }
}

impl std::fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_short_codes() {
        assert_eq!(FilingStatus::parse("S"), Some(FilingStatus::Single));
        assert_eq!(FilingStatus::parse("MFJ"), Some(FilingStatus::MarriedFilingJointly));
        assert_eq!(FilingStatus::parse("MFS"), Some(FilingStatus::MarriedFilingSeparately));
        assert_eq!(FilingStatus::parse("HOH"), Some(FilingStatus::HeadOfHousehold));
    }

    #[test]
    fn parse_accepts_camel_case_names() {
        assert_eq!(
            FilingStatus::parse("marriedJointly"),
            Some(FilingStatus::MarriedFilingJointly)
        );
        assert_eq!(
            FilingStatus::parse("headOfHousehold"),
            Some(FilingStatus::HeadOfHousehold)
        );
    }

    #[test]
    fn parse_round_trips_short_code() {
        for status in FilingStatus::all() {
            assert_eq!(FilingStatus::parse(status.as_str()), Some(*status));
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(FilingStatus::parse("QSS"), None);
        assert_eq!(FilingStatus::parse(""), None);
    }
}
