//! Inclusive settlement window and the per-provider split.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::{Platform, Record};

/// Inclusive `[start, end]` date interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            bail!("end date {end} is before start date {start}");
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Rows inside a range, split by provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformSplit {
    pub type1: Vec<Record>,
    pub type2: Vec<Record>,
    /// In-range rows whose platform tag matched neither provider
    pub unrecognized: Vec<Record>,
}

impl PlatformSplit {
    pub fn group(&self, platform: Platform) -> &[Record] {
        match platform {
            Platform::Type1 => &self.type1,
            Platform::Type2 => &self.type2,
        }
    }
}

/// Keep rows dated within `range` and split them by platform tag.
/// Each provider group is stable-sorted by date.
pub fn split_by_platform(records: &[Record], range: &DateRange) -> PlatformSplit {
    let mut split = PlatformSplit::default();

    for r in records.iter().filter(|r| range.contains(r.date)) {
        match r.platform_kind() {
            Some(Platform::Type1) => split.type1.push(r.clone()),
            Some(Platform::Type2) => split.type2.push(r.clone()),
            None => split.unrecognized.push(r.clone()),
        }
    }

    split.type1.sort_by_key(|r| r.date);
    split.type2.sort_by_key(|r| r.date);

    if !split.unrecognized.is_empty() {
        let mut tags: Vec<&str> = split.unrecognized.iter().map(|r| r.platform.as_str()).collect();
        tags.sort_unstable();
        tags.dedup();
        tracing::warn!(
            rows = split.unrecognized.len(),
            tags = ?tags,
            "rows with unrecognized platform tags excluded from settlement"
        );
    }

    split
}
