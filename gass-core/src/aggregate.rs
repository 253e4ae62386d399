//! Amount/count aggregation, overall and per day.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::record::Record;

/// How many rows share one amount value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountCount {
    pub amount: Decimal,
    pub count: u64,
}

impl AmountCount {
    /// `amount x count`; errors instead of overflowing.
    pub fn subtotal(&self) -> Result<Decimal> {
        self.amount
            .checked_mul(Decimal::from(self.count))
            .ok_or_else(|| anyhow!("overflow computing {} x {}", self.amount, self.count))
    }
}

/// All pairs for a single date
#[derive(Debug, Clone, PartialEq)]
pub struct DailyGroup {
    pub date: NaiveDate,
    pub pairs: Vec<AmountCount>,
}

/// Count occurrences of each amount, most frequent first.
/// Ties keep the order in which the amount first appeared.
pub fn value_counts(amounts: impl IntoIterator<Item = Decimal>) -> Vec<AmountCount> {
    // A Vec rather than a map: the stable sort below relies on insertion
    // order to keep first-seen amounts ahead on ties.
    let mut pairs: Vec<AmountCount> = Vec::new();

    for amount in amounts {
        // Decimal equality is numeric, so 50 and 50.0 land in the same bucket.
        match pairs.iter_mut().find(|p| p.amount == amount) {
            Some(p) => p.count += 1,
            None => pairs.push(AmountCount { amount, count: 1 }),
        }
    }

    pairs.sort_by(|a, b| b.count.cmp(&a.count));
    pairs
}

/// Group rows by distinct date (ascending), then count amounts within each date.
pub fn group_by_date(records: &[Record]) -> Vec<DailyGroup> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Decimal>> = BTreeMap::new();
    for r in records {
        by_date.entry(r.date).or_default().push(r.amount);
    }

    by_date
        .into_iter()
        .map(|(date, amounts)| DailyGroup {
            date,
            pairs: value_counts(amounts),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_value_counts_descending_frequency() {
        let pairs = value_counts(vec![dec!(25), dec!(50), dec!(50), dec!(75), dec!(50), dec!(75)]);
        assert_eq!(
            pairs,
            vec![
                AmountCount { amount: dec!(50), count: 3 },
                AmountCount { amount: dec!(75), count: 2 },
                AmountCount { amount: dec!(25), count: 1 },
            ]
        );
    }

    #[test]
    fn test_value_counts_ties_keep_first_appearance() {
        let pairs = value_counts(vec![dec!(3), dec!(1), dec!(2)]);
        let amounts: Vec<_> = pairs.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![dec!(3), dec!(1), dec!(2)]);
    }

    #[test]
    fn test_value_counts_numeric_equality() {
        let pairs = value_counts(vec![dec!(50), dec!(50.0), dec!(50.00)]);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].count, 3);
        assert_eq!(pairs[0].subtotal().unwrap(), dec!(150));
    }

    #[test]
    fn test_subtotal_overflow_is_error() {
        let p = AmountCount { amount: Decimal::MAX, count: 2 };
        assert!(p.subtotal().is_err());
    }

    #[test]
    fn test_value_counts_empty() {
        assert!(value_counts(Vec::<Decimal>::new()).is_empty());
    }

    #[test]
    fn test_group_by_date_sorted() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let rows = vec![
            Record::new(d2, "t", "Digital_Assets_Type_1", dec!(10)),
            Record::new(d1, "t", "Digital_Assets_Type_1", dec!(50)),
            Record::new(d1, "t", "Digital_Assets_Type_1", dec!(50)),
        ];

        let groups = group_by_date(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, d1);
        assert_eq!(groups[0].pairs, vec![AmountCount { amount: dec!(50), count: 2 }]);
        assert_eq!(groups[1].date, d2);
        assert_eq!(groups[1].pairs[0].count, 1);
    }
}
