pub mod error;
pub mod insights;
pub mod ledger;
pub mod stock;

#[cfg(test)]
mod testing;

pub use error::{ComputeError, Result};
pub use insights::{GeminiClient, InsightGenerator, build_insights_prompt};
pub use ledger::{TransactionFilter, list_transactions, record, record_donation, record_issue};
