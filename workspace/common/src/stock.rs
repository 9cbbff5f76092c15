use model::entities::BloodGroup;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Groups holding fewer units than this are reported as low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;

/// Availability of a blood group relative to the low-stock threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum StockStatus {
    Low,
    Available,
}

impl StockStatus {
    pub fn classify(units: i32, threshold: i32) -> Self {
        if units < threshold {
            StockStatus::Low
        } else {
            StockStatus::Available
        }
    }
}

/// Units on hand for one blood group.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StockLevel {
    pub blood_group: BloodGroup,
    pub units: i32,
    pub status: StockStatus,
}

impl StockLevel {
    pub fn new(blood_group: BloodGroup, units: i32, threshold: i32) -> Self {
        Self {
            blood_group,
            units,
            status: StockStatus::classify(units, threshold),
        }
    }

    pub fn is_low(&self) -> bool {
        self.status == StockStatus::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_uses_strict_threshold() {
        assert_eq!(StockStatus::classify(0, 5), StockStatus::Low);
        assert_eq!(StockStatus::classify(4, 5), StockStatus::Low);
        assert_eq!(StockStatus::classify(5, 5), StockStatus::Available);
        assert_eq!(StockStatus::classify(12, 5), StockStatus::Available);
    }

    #[test]
    fn test_stock_level_serialization() {
        let level = StockLevel::new(BloodGroup::AbNegative, 3, DEFAULT_LOW_STOCK_THRESHOLD);
        let json = serde_json::to_value(&level).unwrap();

        assert_eq!(json["blood_group"], "AB-");
        assert_eq!(json["units"], 3);
        assert_eq!(json["status"], "Low");
        assert!(level.is_low());
    }
}
