//! Read-side views over stock, the transaction log and the donor registry.
//!
//! These feed the stock report, the "my blood type" check, the low-stock
//! list and the dashboard charts.

use common::converters::{daily_units_from_events, stock_levels_from_rows};
use common::{DailyUnits, GenderCount, StockLevel};
use model::entities::prelude::*;
use model::entities::{BloodGroup, Gender, TransactionKind, donor, stock, stock_transaction};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Iterable, PaginatorTrait, QueryFilter};
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

/// Current level of every blood group, in report order.
#[instrument(skip(db))]
pub async fn stock_levels(db: &DatabaseConnection, threshold: i32) -> Result<Vec<StockLevel>> {
    let rows = Stock::find().all(db).await?;
    debug!("Loaded {} stock row(s)", rows.len());

    Ok(stock_levels_from_rows(
        rows.into_iter().map(|row| (row.blood_group, row.units)).collect(),
        threshold,
    ))
}

/// Current level of a single blood group.
#[instrument(skip(db))]
pub async fn stock_level(
    db: &DatabaseConnection,
    blood_group: BloodGroup,
    threshold: i32,
) -> Result<StockLevel> {
    let row = Stock::find()
        .filter(stock::Column::BloodGroup.eq(blood_group))
        .one(db)
        .await?
        .ok_or(ComputeError::StockRowMissing(blood_group))?;

    Ok(StockLevel::new(row.blood_group, row.units, threshold))
}

/// The groups that are currently low, in report order.
pub fn groups_needed(levels: &[StockLevel]) -> Vec<StockLevel> {
    levels.iter().filter(|level| level.is_low()).cloned().collect()
}

/// Donated units per calendar day, oldest first.
#[instrument(skip(db))]
pub async fn donations_over_time(db: &DatabaseConnection) -> Result<Vec<DailyUnits>> {
    let donations = StockTransaction::find()
        .filter(stock_transaction::Column::Kind.eq(TransactionKind::Donation))
        .all(db)
        .await?;
    debug!("Aggregating {} donation(s)", donations.len());

    Ok(daily_units_from_events(
        donations
            .into_iter()
            .map(|entry| (entry.created_at, entry.units))
            .collect(),
    ))
}

/// Number of registered donors per gender. Genders without donors are omitted.
#[instrument(skip(db))]
pub async fn gender_distribution(db: &DatabaseConnection) -> Result<Vec<GenderCount>> {
    let mut counts = Vec::new();
    for gender in Gender::iter() {
        let count = Donor::find()
            .filter(donor::Column::Gender.eq(gender))
            .count(db)
            .await?;
        if count > 0 {
            counts.push(GenderCount::new(gender, count));
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{record_donation, record_issue};
    use crate::testing::{add_donor_with_gender, setup_db};
    use common::{DEFAULT_LOW_STOCK_THRESHOLD, StockStatus};

    #[tokio::test]
    async fn test_stock_levels_report_all_groups_in_order() {
        let db = setup_db().await;
        record_donation(&db, BloodGroup::ONegative, 6, None).await.unwrap();

        let levels = stock_levels(&db, DEFAULT_LOW_STOCK_THRESHOLD).await.unwrap();

        let groups: Vec<_> = levels.iter().map(|level| level.blood_group).collect();
        assert_eq!(groups, BloodGroup::ALL.to_vec());

        let o_negative = levels
            .iter()
            .find(|level| level.blood_group == BloodGroup::ONegative)
            .unwrap();
        assert_eq!(o_negative.units, 6);
        assert_eq!(o_negative.status, StockStatus::Available);
    }

    #[tokio::test]
    async fn test_stock_level_status() {
        let db = setup_db().await;
        record_donation(&db, BloodGroup::BPositive, 4, None).await.unwrap();

        let level = stock_level(&db, BloodGroup::BPositive, 5).await.unwrap();
        assert_eq!(level.units, 4);
        assert_eq!(level.status, StockStatus::Low);

        let level = stock_level(&db, BloodGroup::BPositive, 4).await.unwrap();
        assert_eq!(level.status, StockStatus::Available);
    }

    #[tokio::test]
    async fn test_groups_needed_lists_low_groups() {
        let db = setup_db().await;
        for group in BloodGroup::ALL {
            record_donation(&db, group, 10, None).await.unwrap();
        }
        record_issue(&db, BloodGroup::AbNegative, 8).await.unwrap();

        let levels = stock_levels(&db, DEFAULT_LOW_STOCK_THRESHOLD).await.unwrap();
        let needed = groups_needed(&levels);

        assert_eq!(needed.len(), 1);
        assert_eq!(needed[0].blood_group, BloodGroup::AbNegative);
        assert_eq!(needed[0].units, 2);
    }

    #[tokio::test]
    async fn test_donations_over_time_ignores_issues() {
        let db = setup_db().await;
        record_donation(&db, BloodGroup::APositive, 3, None).await.unwrap();
        record_donation(&db, BloodGroup::BPositive, 2, None).await.unwrap();
        record_issue(&db, BloodGroup::APositive, 1).await.unwrap();

        let series = donations_over_time(&db).await.unwrap();

        let total: i64 = series.iter().map(|point| point.units).sum();
        assert_eq!(total, 5);
        assert!(!series.is_empty());
    }

    #[tokio::test]
    async fn test_gender_distribution_counts_donors() {
        let db = setup_db().await;
        add_donor_with_gender(&db, BloodGroup::APositive, Gender::Female).await;
        add_donor_with_gender(&db, BloodGroup::OPositive, Gender::Female).await;
        add_donor_with_gender(&db, BloodGroup::BPositive, Gender::Male).await;

        let distribution = gender_distribution(&db).await.unwrap();

        assert_eq!(
            distribution,
            vec![
                GenderCount::new(Gender::Male, 1),
                GenderCount::new(Gender::Female, 2),
            ]
        );
    }
}
