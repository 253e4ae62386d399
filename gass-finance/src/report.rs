//! Settlement report: the whole pipeline from cleaned records to the
//! lines printed on screen and saved to the history file.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use gass_core::aggregate::{group_by_date, value_counts};
use gass_core::range::{DateRange, split_by_platform};
use gass_core::record::{Platform, Record};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::money;
use crate::settlement::{SettlementResult, settle};
use crate::valuation::{Valuation, valuate};

const RULE: &str = "========================================";
const THIN_RULE: &str = "----------------------------------------";

/// Per-date valuations for one provider plus its overall total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSection {
    pub platform: Platform,
    pub days: Vec<(NaiveDate, Valuation)>,
    pub total: Valuation,
}

impl ProviderSection {
    pub fn build(platform: Platform, records: &[Record]) -> Result<Self> {
        let days = group_by_date(records)
            .into_iter()
            .map(|g| {
                let valuation = valuate(platform, &g.pairs)
                    .with_context(|| format!("valuing {} on {}", platform.tag(), g.date))?;
                Ok::<_, anyhow::Error>((g.date, valuation))
            })
            .collect::<Result<Vec<_>>>()?;

        let total = if records.is_empty() {
            Valuation::empty(platform)
        } else {
            valuate(platform, &value_counts(records.iter().map(|r| r.amount)))
                .with_context(|| format!("valuing {} total", platform.tag()))?
        };

        Ok(Self { platform, days, total })
    }

    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![format!(">>> PROVIDER: {}", self.platform.heading())];
        for (date, valuation) in &self.days {
            out.push(THIN_RULE.to_string());
            out.push(format!("DATE: {date}"));
            out.extend(valuation.lines());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementReport {
    pub account_id: String,
    pub range: DateRange,
    pub generated_at: String,
    pub type1: ProviderSection,
    pub type2: ProviderSection,
    pub unrecognized_rows: usize,
    pub settlement: SettlementResult,
}

impl SettlementReport {
    /// Filter, aggregate, value and settle `records` (already cleaned).
    pub fn build(
        account_id: impl Into<String>,
        records: &[Record],
        range: DateRange,
        official_rate: Decimal,
        generated_at: impl Into<String>,
    ) -> Result<Self> {
        let split = split_by_platform(records, &range);
        let type1 = ProviderSection::build(Platform::Type1, &split.type1)?;
        let type2 = ProviderSection::build(Platform::Type2, &split.type2)?;
        let settlement = settle(type1.total.usd, type2.total.usd, official_rate)?;

        tracing::info!(
            type1_rows = split.type1.len(),
            type2_rows = split.type2.len(),
            raw_total_usd = %settlement.raw_total_usd,
            "settlement computed"
        );

        Ok(Self {
            account_id: account_id.into(),
            range,
            generated_at: generated_at.into(),
            type1,
            type2,
            unrecognized_rows: split.unrecognized.len(),
            settlement,
        })
    }

    /// `Settlement_<ACCOUNT_ID>_<start-date>.txt`
    pub fn file_name(&self) -> String {
        format!("Settlement_{}_{}.txt", self.account_id, self.range.start())
    }

    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![
            RULE.to_string(),
            "       GLOBAL ASSETS SETTLEMENT".to_string(),
            format!("       ACCOUNT ID: {}", self.account_id),
            format!("       PERIOD: {} TO {}", self.range.start(), self.range.end()),
            format!("       GENERATED: {}", self.generated_at),
            RULE.to_string(),
            String::new(),
        ];

        out.extend(self.type1.lines());
        out.push(String::new());
        out.extend(self.type2.lines());

        if self.unrecognized_rows > 0 {
            out.push(format!(
                "NOTE: {} row(s) with an unrecognized platform were not settled",
                self.unrecognized_rows
            ));
        }

        out.extend(self.summary_lines());
        out
    }

    fn summary_lines(&self) -> Vec<String> {
        let s = &self.settlement;
        vec![
            RULE.to_string(),
            "           FINANCIAL SUMMARY".to_string(),
            RULE.to_string(),
            format!("RAW ASSETS TOTAL:      {} $", money(s.raw_total_usd)),
            format!("LIQUIDATED (USDT):     {} USDT", money(s.liquidated_usdt)),
            format!("MARKET RATE APPLIED:   {} VES/USDT", money(s.market_rate)),
            THIN_RULE.to_string(),
            format!(
                "YOUR FEE ({}%):        {} VES ({} $ BCV)",
                SettlementResult::fee_percent(),
                money(s.commission_ves),
                money(s.commission_usd_equiv)
            ),
            format!(
                "OWNER PAYOUT:          {} VES ({} $ BCV)",
                money(s.owner_ves),
                money(s.owner_usd_equiv)
            ),
            format!("OFFICIAL BCV RATE:     {} VES", money(s.official_rate)),
            RULE.to_string(),
            String::new(),
        ]
    }
}
