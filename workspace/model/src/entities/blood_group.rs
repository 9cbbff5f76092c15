use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// One of the eight ABO/Rh blood groups.
///
/// Used as the key of the stock table and for donor lookup. The stored and
/// serialized form is the canonical label, e.g. `"AB+"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
pub enum BloodGroup {
    #[sea_orm(string_value = "A+")]
    #[serde(rename = "A+")]
    APositive,
    #[sea_orm(string_value = "A-")]
    #[serde(rename = "A-")]
    ANegative,
    #[sea_orm(string_value = "B+")]
    #[serde(rename = "B+")]
    BPositive,
    #[sea_orm(string_value = "B-")]
    #[serde(rename = "B-")]
    BNegative,
    #[sea_orm(string_value = "O+")]
    #[serde(rename = "O+")]
    OPositive,
    #[sea_orm(string_value = "O-")]
    #[serde(rename = "O-")]
    ONegative,
    #[sea_orm(string_value = "AB+")]
    #[serde(rename = "AB+")]
    AbPositive,
    #[sea_orm(string_value = "AB-")]
    #[serde(rename = "AB-")]
    AbNegative,
}

impl BloodGroup {
    /// All groups in the order they are listed on stock reports.
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
        }
    }

    /// Position in [`BloodGroup::ALL`], used to sort query results.
    pub fn report_position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|group| group == self)
            .unwrap_or(Self::ALL.len())
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown blood group '{0}'")]
pub struct UnknownBloodGroup(pub String);

impl FromStr for BloodGroup {
    type Err = UnknownBloodGroup;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == normalized)
            .ok_or_else(|| UnknownBloodGroup(s.to_string()))
    }
}

/// Gender as recorded for users and donors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Gender {
    #[sea_orm(string_value = "Male")]
    Male,
    #[sea_orm(string_value = "Female")]
    Female,
    #[sea_orm(string_value = "Other")]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ab+".parse::<BloodGroup>().unwrap(), BloodGroup::AbPositive);
        assert_eq!(" o- ".parse::<BloodGroup>().unwrap(), BloodGroup::ONegative);
        assert_eq!("B+".parse::<BloodGroup>().unwrap(), BloodGroup::BPositive);
    }

    #[test]
    fn test_parse_rejects_unknown_groups() {
        assert!("C+".parse::<BloodGroup>().is_err());
        assert!("A".parse::<BloodGroup>().is_err());
        assert!("".parse::<BloodGroup>().is_err());
    }

    #[test]
    fn test_labels_round_trip_through_display() {
        for group in BloodGroup::ALL {
            assert_eq!(group.to_string().parse::<BloodGroup>().unwrap(), group);
        }
    }

    #[test]
    fn test_serde_uses_canonical_labels() {
        let json = serde_json::to_string(&BloodGroup::AbNegative).unwrap();
        assert_eq!(json, "\"AB-\"");

        let parsed: BloodGroup = serde_json::from_str("\"O+\"").unwrap();
        assert_eq!(parsed, BloodGroup::OPositive);
    }

    #[test]
    fn test_report_position_follows_canonical_order() {
        assert_eq!(BloodGroup::APositive.report_position(), 0);
        assert_eq!(BloodGroup::AbNegative.report_position(), 7);
    }
}
