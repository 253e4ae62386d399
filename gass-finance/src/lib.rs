//! gass-finance: reward valuation, settlement arithmetic and the settlement report

pub mod format;
pub mod report;
pub mod settlement;
pub mod valuation;

pub use report::{ProviderSection, SettlementReport};
pub use settlement::{LIQUIDATION_RATE, SERVICE_FEE_RATE, SPREAD_FACTOR, SettlementResult, settle};
pub use valuation::{POINTS_PER_USD, Valuation, ValuedPair, valuate};
