use model::entities::BloodGroup;
use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A stock change must move at least one unit
    #[error("Units must be at least 1, got {0}")]
    InvalidUnits(i32),

    /// Blood group label that is not one of the eight canonical groups
    #[error("Unknown blood group '{0}'")]
    UnknownBloodGroup(String),

    /// A donation referenced a donor that is not in the registry
    #[error("Donor with id {0} does not exist")]
    DonorNotFound(i32),

    /// The stock table has no row for the group
    #[error("No stock row for blood group {0}")]
    StockRowMissing(BloodGroup),

    /// An issue would drive the counter below zero
    #[error("Not enough stock for {blood_group}: {available} available, {requested} requested")]
    InsufficientStock {
        blood_group: BloodGroup,
        available: i32,
        requested: i32,
    },

    /// A donation would push the counter past what it can hold
    #[error("Stock of {blood_group} cannot hold {requested} more unit(s), {available} already stored")]
    StockCapacityExceeded {
        blood_group: BloodGroup,
        available: i32,
        requested: i32,
    },

    /// No API key is configured for the insights provider
    #[error("AI insights are not configured")]
    InsightsUnavailable,

    /// The insights provider failed or returned nothing usable
    #[error("Insights error: {0}")]
    Insights(String),
}

impl From<model::entities::UnknownBloodGroup> for ComputeError {
    fn from(error: model::entities::UnknownBloodGroup) -> Self {
        ComputeError::UnknownBloodGroup(error.0)
    }
}

impl From<reqwest::Error> for ComputeError {
    fn from(error: reqwest::Error) -> Self {
        tracing::error!(?error, "Insights request failed");
        ComputeError::Insights(error.to_string())
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
