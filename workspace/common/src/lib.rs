//! Transport-layer types shared by the API handlers and the compute crate.
//! These are the shapes clients receive for stock reports, chart series and
//! AI insights.

pub mod converters;
mod charts;
mod stock;

pub use charts::{DailyUnits, GenderCount};
pub use stock::{DEFAULT_LOW_STOCK_THRESHOLD, StockLevel, StockStatus};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of an AI insights request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct InsightsReport {
    /// Text produced by the language model.
    pub text: String,
    /// True when the text was served from the cache for an identical stock snapshot.
    pub cached: bool,
    /// Stock snapshot the prompt was built from.
    pub stock: Vec<StockLevel>,
}
