//! Helpers turning raw rows into the transport structures and back into
//! plain text for prompts and logs.

use crate::charts::DailyUnits;
use crate::stock::StockLevel;
use chrono::NaiveDateTime;
use model::entities::BloodGroup;
use std::collections::BTreeMap;

/// Builds stock levels from `(group, units)` rows, ordered as on stock reports.
pub fn stock_levels_from_rows(rows: Vec<(BloodGroup, i32)>, threshold: i32) -> Vec<StockLevel> {
    let mut levels: Vec<StockLevel> = rows
        .into_iter()
        .map(|(group, units)| StockLevel::new(group, units, threshold))
        .collect();
    levels.sort_by_key(|level| level.blood_group.report_position());
    levels
}

/// Sums timestamped unit counts per calendar day, oldest day first.
pub fn daily_units_from_events(events: Vec<(NaiveDateTime, i32)>) -> Vec<DailyUnits> {
    let mut per_day: BTreeMap<chrono::NaiveDate, i64> = BTreeMap::new();
    for (timestamp, units) in events {
        *per_day.entry(timestamp.date()).or_insert(0) += i64::from(units);
    }

    tracing::trace!("Grouped donations into {} days", per_day.len());

    per_day
        .into_iter()
        .map(|(date, units)| DailyUnits::new(date, units))
        .collect()
}

/// Renders stock levels as a two-column text table.
pub fn stock_levels_to_table(levels: &[StockLevel]) -> String {
    let mut table = String::from("Blood Group | Units\n");
    for level in levels {
        table.push_str(&format!("{:<11} | {}\n", level.blood_group.as_str(), level.units));
    }
    table
}
