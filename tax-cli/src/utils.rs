use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes money input for decimal parsing: trims whitespace and removes
/// `$` and commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$' && !c.is_whitespace())
        .collect()
}

/// Parses a string into a [`Decimal`].
///
/// Handles `$` and comma thousands separators (e.g. `"$1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| ParseDecimalError {
        input: s.to_string(),
        source: e,
    })
}

/// Lenient money conversion for scenario fields.
///
/// Anything [`parse_decimal`] rejects becomes 0 and is logged as a warning;
/// a malformed field never fails the scenario.
pub fn decimal_or_zero(
    field: &str,
    s: &str,
) -> Decimal {
    parse_decimal(s).unwrap_or_else(|e| {
        tracing::warn!(field, input = %s, "malformed amount treated as 0: {}", e);
        Decimal::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_strips_dollar_sign() {
        assert_eq!(parse_decimal("$100,000").unwrap(), dec!(100000));
        assert_eq!(parse_decimal(" $ 42.50 ").unwrap(), dec!(42.50));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("$").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        let err = parse_decimal("abc").unwrap_err();

        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn decimal_or_zero_swallows_malformed_input() {
        assert_eq!(decimal_or_zero("hsa", "12x"), Decimal::ZERO);
        assert_eq!(decimal_or_zero("hsa", "$1,500"), dec!(1500));
    }

    #[test]
    fn decimal_or_zero_keeps_sign() {
        assert_eq!(decimal_or_zero("other", "-250"), dec!(-250));
    }
}
