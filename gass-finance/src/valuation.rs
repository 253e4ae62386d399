//! Convert aggregated amounts into a USD value, one policy per provider.
//!
//! Type 1 amounts are points (100 points = 1 USD); Type 2 amounts are
//! already dollars. Both track the number of units (rows) valued.

use anyhow::{Context, Result};
use gass_core::aggregate::AmountCount;
use gass_core::record::Platform;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::format::{money, plain};

pub const POINTS_PER_USD: Decimal = dec!(100);

/// An aggregated amount with its already-checked `amount x count`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuedPair {
    pub amount: Decimal,
    pub count: u64,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Valuation {
    pub platform: Platform,
    pub pairs: Vec<ValuedPair>,
    /// Sum of amount x count in the provider's own unit (points or dollars)
    pub subtotal: Decimal,
    pub units: u64,
    pub usd: Decimal,
}

pub fn valuate(platform: Platform, pairs: &[AmountCount]) -> Result<Valuation> {
    let mut valued = Vec::with_capacity(pairs.len());
    let mut subtotal = Decimal::ZERO;
    let mut units: u64 = 0;

    for p in pairs {
        let pair_total = p.subtotal()?;
        subtotal = subtotal
            .checked_add(pair_total)
            .with_context(|| format!("overflow summing {} subtotals", platform.tag()))?;
        units = units
            .checked_add(p.count)
            .context("overflow counting units")?;
        valued.push(ValuedPair {
            amount: p.amount,
            count: p.count,
            subtotal: pair_total,
        });
    }

    let usd = match platform {
        Platform::Type1 => subtotal / POINTS_PER_USD,
        Platform::Type2 => subtotal,
    };

    Ok(Valuation {
        platform,
        pairs: valued,
        subtotal,
        units,
        usd,
    })
}

impl Valuation {
    pub fn empty(platform: Platform) -> Self {
        Self {
            platform,
            pairs: Vec::new(),
            subtotal: Decimal::ZERO,
            units: 0,
            usd: Decimal::ZERO,
        }
    }

    /// Per-pair detail lines followed by the provider summary.
    pub fn lines(&self) -> Vec<String> {
        let mut out: Vec<String> = self.pairs.iter().map(|p| self.pair_line(p)).collect();

        out.push(String::new());
        match self.platform {
            Platform::Type1 => out.push(format!(
                "TOTAL TYPE 1: {} PTS ---> {} $",
                plain(self.subtotal),
                money(self.usd)
            )),
            Platform::Type2 => out.push(format!("TOTAL TYPE 2: {} $", money(self.usd))),
        }
        out.push(format!("TOTAL TASKS: {}", self.units));
        out.push(String::new());
        out
    }

    fn pair_line(&self, p: &ValuedPair) -> String {
        match self.platform {
            Platform::Type1 => format!(
                "{} PTS: {} units ---> Subtotal: {} points",
                plain(p.amount),
                p.count,
                plain(p.subtotal)
            ),
            Platform::Type2 => format!(
                "{} $: {} units ---> Subtotal: {} $",
                plain(p.amount),
                p.count,
                plain(p.subtotal)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gass_core::aggregate::value_counts;
    use proptest::prelude::*;

    fn pair(amount: Decimal, count: u64) -> AmountCount {
        AmountCount { amount, count }
    }

    #[test]
    fn test_type1_points_to_usd() {
        let pairs = value_counts(vec![dec!(50), dec!(50)]);
        let v = valuate(Platform::Type1, &pairs).unwrap();
        assert_eq!(
            v.pairs,
            vec![ValuedPair { amount: dec!(50), count: 2, subtotal: dec!(100) }]
        );
        assert_eq!(v.subtotal, dec!(100));
        assert_eq!(v.usd, dec!(1.00));
        assert_eq!(v.units, 2);
    }

    #[test]
    fn test_type2_direct_usd() {
        let v = valuate(Platform::Type2, &[pair(dec!(5), 3), pair(dec!(1.25), 2)]).unwrap();
        assert_eq!(v.subtotal, dec!(17.50));
        assert_eq!(v.usd, dec!(17.50));
        assert_eq!(v.units, 5);
    }

    #[test]
    fn test_empty_valuation_is_zero() {
        for platform in Platform::ALL {
            let v = Valuation::empty(platform);
            assert_eq!(v.usd, Decimal::ZERO);
            assert_eq!(v.units, 0);
        }
    }

    #[test]
    fn test_overflowing_amounts_are_errors() {
        let huge = dec!(50000000000000000000000000000);
        // each pair fits on its own, their sum does not
        assert!(valuate(Platform::Type2, &[pair(huge, 1), pair(huge, 1)]).is_err());
        // the per-pair multiplication overflows
        assert!(valuate(Platform::Type1, &[pair(huge, 2)]).is_err());
    }

    #[test]
    fn test_type1_lines() {
        let v = valuate(Platform::Type1, &[pair(dec!(50), 2), pair(dec!(25.0), 1)]).unwrap();
        assert_eq!(
            v.lines(),
            vec![
                "50 PTS: 2 units ---> Subtotal: 100 points",
                "25 PTS: 1 units ---> Subtotal: 25 points",
                "",
                "TOTAL TYPE 1: 125 PTS ---> 1.25 $",
                "TOTAL TASKS: 3",
                "",
            ]
        );
    }

    #[test]
    fn test_type2_lines() {
        let v = valuate(Platform::Type2, &[pair(dec!(0.5), 3)]).unwrap();
        assert_eq!(
            v.lines(),
            vec![
                "0.5 $: 3 units ---> Subtotal: 1.5 $",
                "",
                "TOTAL TYPE 2: 1.50 $",
                "TOTAL TASKS: 3",
                "",
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_totals_match_formula(
            raw in proptest::collection::vec((0u32..100_000, 0u32..100, 1u64..500), 0..20)
        ) {
            // (integer part, cents, count)
            let pairs: Vec<AmountCount> = raw
                .iter()
                .map(|(units, cents, count)| {
                    pair(Decimal::from(*units) + Decimal::new(i64::from(*cents), 2), *count)
                })
                .collect();
            let expected: Decimal = pairs.iter().map(|p| p.amount * Decimal::from(p.count)).sum();
            let expected_units: u64 = pairs.iter().map(|p| p.count).sum();

            let t1 = valuate(Platform::Type1, &pairs).unwrap();
            let t2 = valuate(Platform::Type2, &pairs).unwrap();
            prop_assert_eq!(t1.usd, expected / dec!(100));
            prop_assert_eq!(t2.usd, expected);
            prop_assert_eq!(t1.units, expected_units);
            prop_assert_eq!(t2.units, expected_units);
        }
    }
}
