use chrono::NaiveDate;
use model::entities::Gender;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Donated units summed over one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DailyUnits {
    pub date: NaiveDate,
    pub units: i64,
}

impl DailyUnits {
    pub fn new(date: NaiveDate, units: i64) -> Self {
        Self { date, units }
    }
}

/// Number of registered donors of one gender.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GenderCount {
    pub gender: Gender,
    pub count: u64,
}

impl GenderCount {
    pub fn new(gender: Gender, count: u64) -> Self {
        Self { gender, count }
    }
}
