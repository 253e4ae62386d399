//! Settlement arithmetic: raw USD value -> USDT liquidation -> fee split ->
//! VES payout at the market-adjusted official rate.

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Gift card value recovered when liquidating to USDT
pub const LIQUIDATION_RATE: Decimal = dec!(0.75);
/// Management fee taken from the liquidated amount
pub const SERVICE_FEE_RATE: Decimal = dec!(0.10);
/// Parallel-market correction applied to the official rate (USDT-parallel / BCV)
pub const SPREAD_FACTOR: Decimal = dec!(1.824);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementResult {
    pub raw_total_usd: Decimal,
    pub liquidated_usdt: Decimal,
    pub commission_usdt: Decimal,
    pub owner_usdt: Decimal,
    pub market_rate: Decimal,
    pub commission_ves: Decimal,
    pub owner_ves: Decimal,
    pub commission_usd_equiv: Decimal,
    pub owner_usd_equiv: Decimal,
    pub official_rate: Decimal,
}

fn mul(a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_mul(b).with_context(|| format!("overflow computing {what}"))
}

/// Run the full conversion chain for the two provider totals.
pub fn settle(type1_usd: Decimal, type2_usd: Decimal, official_rate: Decimal) -> Result<SettlementResult> {
    if official_rate <= Decimal::ZERO {
        bail!("official rate must be positive, got {official_rate}");
    }

    let raw_total_usd = type1_usd
        .checked_add(type2_usd)
        .context("overflow computing raw total")?;

    let liquidated_usdt = mul(raw_total_usd, LIQUIDATION_RATE, "liquidated USDT")?;
    let commission_usdt = mul(liquidated_usdt, SERVICE_FEE_RATE, "commission USDT")?;
    let owner_usdt = liquidated_usdt - commission_usdt;

    let market_rate = mul(official_rate, SPREAD_FACTOR, "market rate")?;
    let commission_ves = mul(commission_usdt, market_rate, "commission VES")?;
    let owner_ves = mul(owner_usdt, market_rate, "owner VES")?;

    // Local stores price at the official rate, so VES is valued back at it.
    let commission_usd_equiv = commission_ves
        .checked_div(official_rate)
        .context("overflow computing commission USD equivalent")?;
    let owner_usd_equiv = owner_ves
        .checked_div(official_rate)
        .context("overflow computing owner USD equivalent")?;

    Ok(SettlementResult {
        raw_total_usd,
        liquidated_usdt,
        commission_usdt,
        owner_usdt,
        market_rate,
        commission_ves,
        owner_ves,
        commission_usd_equiv,
        owner_usd_equiv,
        official_rate,
    })
}

impl SettlementResult {
    /// Fee percentage shown in the summary, e.g. `10`
    pub fn fee_percent() -> Decimal {
        (SERVICE_FEE_RATE * dec!(100)).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_chain() {
        let s = settle(dec!(60), dec!(40), dec!(36.0)).unwrap();
        assert_eq!(s.raw_total_usd, dec!(100));
        assert_eq!(s.liquidated_usdt, dec!(75.00));
        assert_eq!(s.commission_usdt, dec!(7.50));
        assert_eq!(s.owner_usdt, dec!(67.50));
        assert_eq!(s.market_rate, dec!(65.664));
        assert_eq!(s.commission_ves, dec!(492.48));
        assert_eq!(s.owner_ves, dec!(4432.32));
        assert_eq!(s.commission_usd_equiv, dec!(13.68));
        assert_eq!(s.owner_usd_equiv, dec!(123.12));
        assert_eq!(s.official_rate, dec!(36));
    }

    #[test]
    fn test_fee_split_is_exact() {
        for raw in [dec!(0.01), dec!(3.33), dec!(1234.567), dec!(99999.99)] {
            let s = settle(raw, Decimal::ZERO, dec!(41.2718)).unwrap();
            assert_eq!(s.commission_usdt + s.owner_usdt, s.liquidated_usdt);
        }
    }

    #[test]
    fn test_owner_usd_equiv_consistent() {
        let s = settle(dec!(12.34), dec!(5.5), dec!(52.1234)).unwrap();
        assert_eq!(s.owner_ves / s.official_rate, s.owner_usd_equiv);
    }

    #[test]
    fn test_zero_totals() {
        let s = settle(Decimal::ZERO, Decimal::ZERO, dec!(36)).unwrap();
        assert_eq!(s.owner_ves, Decimal::ZERO);
        assert_eq!(s.market_rate, dec!(65.664));
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        assert!(settle(dec!(1), dec!(1), Decimal::ZERO).is_err());
        assert!(settle(dec!(1), dec!(1), dec!(-36)).is_err());
    }

    #[test]
    fn test_fee_percent() {
        assert_eq!(SettlementResult::fee_percent().to_string(), "10");
    }
}
