use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One segment of a progressive schedule.
///
/// The lower bound is implied by the previous bracket's `max_income`
/// (zero for the first bracket). `max_income == None` marks the top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub rate: Decimal,
    pub max_income: Option<Decimal>,
}

impl TaxBracket {
    pub fn bounded(
        rate: Decimal,
        max_income: Decimal,
    ) -> Self {
        Self {
            rate,
            max_income: Some(max_income),
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            rate,
            max_income: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_income.is_none()
    }
}

/// Errors raised when a bracket table violates its ordering rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket {index} has a negative rate {rate}")]
    NegativeRate { index: usize, rate: Decimal },

    #[error("bracket {index} upper bound {bound} is not above the previous bound {previous}")]
    NotAscending {
        index: usize,
        bound: Decimal,
        previous: Decimal,
    },
}

/// An ordered progressive schedule. An empty table taxes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Builds a table, checking that rates are non-negative and that bounded
    /// upper limits strictly ascend up to the first unbounded bracket.
    ///
    /// Brackets after the first unbounded one are accepted and kept, but the
    /// tax function never reaches them. See [`BracketTable::dead_brackets`].
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        let mut previous = Decimal::ZERO;
        let mut reached_top = false;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO {
                return Err(BracketTableError::NegativeRate {
                    index,
                    rate: bracket.rate,
                });
            }
            if reached_top {
                continue;
            }
            match bracket.max_income {
                Some(bound) if bound <= previous => {
                    return Err(BracketTableError::NotAscending {
                        index,
                        bound,
                        previous,
                    });
                }
                Some(bound) => previous = bound,
                None => reached_top = true,
            }
        }

        Ok(Self { brackets })
    }

    /// A no-income-tax jurisdiction.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single unbounded bracket at `rate`.
    pub fn flat(rate: Decimal) -> Self {
        Self {
            brackets: vec![TaxBracket::unbounded(rate)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxBracket> {
        self.brackets.iter()
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Brackets listed after the first unbounded bracket.
    pub fn dead_brackets(&self) -> &[TaxBracket] {
        match self.brackets.iter().position(TaxBracket::is_unbounded) {
            Some(top) => &self.brackets[top + 1..],
            None => &[],
        }
    }

    /// True when the table is non-empty and no bracket is unbounded, which
    /// leaves income above the last bound untaxed.
    pub fn is_capped(&self) -> bool {
        !self.brackets.is_empty() && !self.brackets.iter().any(TaxBracket::is_unbounded)
    }
}

impl<'a> IntoIterator for &'a BracketTable {
    type Item = &'a TaxBracket;
    type IntoIter = std::slice::Iter<'a, TaxBracket>;

    fn into_iter(self) -> Self::IntoIter {
        self.brackets.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_accepts_ascending_table() {
        let table = BracketTable::new(vec![
            TaxBracket::bounded(dec!(0.02), dec!(500)),
            TaxBracket::bounded(dec!(0.04), dec!(3000)),
            TaxBracket::unbounded(dec!(0.05)),
        ])
        .expect("ascending table should be valid");

        assert_eq!(table.len(), 3);
        assert!(table.dead_brackets().is_empty());
        assert!(!table.is_capped());
    }

    #[test]
    fn new_rejects_descending_bounds() {
        let result = BracketTable::new(vec![
            TaxBracket::bounded(dec!(0.02), dec!(3000)),
            TaxBracket::bounded(dec!(0.04), dec!(500)),
        ]);

        assert_eq!(
            result,
            Err(BracketTableError::NotAscending {
                index: 1,
                bound: dec!(500),
                previous: dec!(3000),
            })
        );
    }

    #[test]
    fn new_rejects_negative_rate() {
        let result = BracketTable::new(vec![TaxBracket::unbounded(dec!(-0.01))]);

        assert_eq!(
            result,
            Err(BracketTableError::NegativeRate {
                index: 0,
                rate: dec!(-0.01),
            })
        );
    }

    #[test]
    fn duplicate_unbounded_bracket_is_dead() {
        let table = BracketTable::new(vec![
            TaxBracket::bounded(dec!(0.113), dec!(698274)),
            TaxBracket::unbounded(dec!(0.123)),
            TaxBracket::unbounded(dec!(0.133)),
        ])
        .expect("duplicate top bracket is tolerated");

        assert_eq!(table.dead_brackets(), &[TaxBracket::unbounded(dec!(0.133))]);
    }

    #[test]
    fn empty_table_has_no_dead_brackets() {
        let table = BracketTable::empty();

        assert!(table.is_empty());
        assert!(table.dead_brackets().is_empty());
        assert!(!table.is_capped());
    }

    #[test]
    fn table_without_unbounded_bracket_is_capped() {
        let table = BracketTable::new(vec![TaxBracket::bounded(dec!(0.01), dec!(1000))])
            .expect("valid table");

        assert!(table.is_capped());
    }
}
