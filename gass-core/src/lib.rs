//! gass-core: ledger records, date ranges and amount aggregation for settlements

pub mod aggregate;
pub mod range;
pub mod record;
pub mod time;

pub use aggregate::{AmountCount, DailyGroup, group_by_date, value_counts};
pub use range::{DateRange, PlatformSplit, split_by_platform};
pub use record::{IGNORED_DESCRIPTIONS, Platform, Record, drop_ignored};
