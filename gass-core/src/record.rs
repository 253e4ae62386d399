//! Ledger record types and the description denylist

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Descriptions that never count toward a settlement (bonuses, punchcards).
pub const IGNORED_DESCRIPTIONS: [&str; 3] =
    ["Punchcard", "Weekly Badge Bonus", "Bonus Welcome Survey"];

/// The two reward providers a ledger can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Points-based rewards, 100 points = 1 USD
    #[serde(rename = "Digital_Assets_Type_1")]
    Type1,
    /// Rewards already denominated in USD
    #[serde(rename = "Digital_Assets_Type_2")]
    Type2,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Type1, Platform::Type2];

    /// Exact tag used in the ledger `platform` column
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Type1 => "Digital_Assets_Type_1",
            Platform::Type2 => "Digital_Assets_Type_2",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.tag() == tag)
    }

    /// Headline used for the provider section of a report
    pub fn heading(&self) -> &'static str {
        match self {
            Platform::Type1 => "DIGITAL ASSETS TYPE 1 (POINTS)",
            Platform::Type2 => "DIGITAL ASSETS TYPE 2 (DIRECT USD)",
        }
    }
}

/// One ledger row as loaded from an account file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub description: String,
    /// Raw platform tag; may be outside the two known providers
    pub platform: String,
    pub amount: Decimal,
}

impl Record {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        platform: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            platform: platform.into(),
            amount,
        }
    }

    pub fn platform_kind(&self) -> Option<Platform> {
        Platform::from_tag(&self.platform)
    }

    /// True when the description is on the denylist (exact match)
    pub fn is_ignored(&self) -> bool {
        IGNORED_DESCRIPTIONS.contains(&self.description.as_str())
    }
}

/// Remove denylisted rows, keeping the order of the rest.
pub fn drop_ignored(mut records: Vec<Record>) -> Vec<Record> {
    records.retain(|r| !r.is_ignored());
    records
}
