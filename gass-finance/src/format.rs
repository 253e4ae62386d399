//! Number formatting shared by report lines.

use rust_decimal::{Decimal, RoundingStrategy};

/// Two decimal places, half away from zero (`7.5` -> `7.50`, `65.664` -> `65.66`).
pub fn money(d: Decimal) -> String {
    let rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Shortest exact form, no trailing zeros (`50.0` -> `50`, `0.50` -> `0.5`).
pub fn plain(d: Decimal) -> String {
    d.normalize().to_string()
}
