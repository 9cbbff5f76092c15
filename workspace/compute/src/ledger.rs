//! Stock-transaction ledger.
//!
//! Donations credit a blood group's counter and issues debit it. Every
//! successful change appends one immutable row to the transaction log. The
//! counter update and the log insert run inside one database transaction, so
//! a failed operation leaves both untouched.

use chrono::Local;
use model::entities::prelude::*;
use model::entities::{BloodGroup, TransactionKind, stock, stock_transaction};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{ComputeError, Result};

/// Filters for reading the transaction log.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub blood_group: Option<BloodGroup>,
}

fn validate_units(units: i32) -> Result<()> {
    if units < 1 {
        return Err(ComputeError::InvalidUnits(units));
    }
    Ok(())
}

/// Records a donation of `units` for `blood_group`.
///
/// When `donor_id` is given the donor must exist in the registry.
#[instrument(skip(db))]
pub async fn record_donation(
    db: &DatabaseConnection,
    blood_group: BloodGroup,
    units: i32,
    donor_id: Option<i32>,
) -> Result<stock_transaction::Model> {
    validate_units(units)?;

    let txn = db.begin().await?;

    if let Some(id) = donor_id {
        trace!("Checking donor {} exists", id);
        if Donor::find_by_id(id).one(&txn).await?.is_none() {
            warn!("Donation rejected, donor {} not found", id);
            return Err(ComputeError::DonorNotFound(id));
        }
    }

    let updated = Stock::update_many()
        .col_expr(
            stock::Column::Units,
            Expr::col(stock::Column::Units).add(units),
        )
        .filter(stock::Column::BloodGroup.eq(blood_group))
        .filter(stock::Column::Units.lte(i32::MAX - units))
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        let row = Stock::find()
            .filter(stock::Column::BloodGroup.eq(blood_group))
            .one(&txn)
            .await?;
        return Err(match row {
            Some(row) => {
                let overflow = ComputeError::StockCapacityExceeded {
                    blood_group,
                    available: row.units,
                    requested: units,
                };
                warn!("{}", overflow);
                overflow
            }
            None => {
                warn!("No stock row for {}", blood_group);
                ComputeError::StockRowMissing(blood_group)
            }
        });
    }

    let entry = append_entry(&txn, TransactionKind::Donation, blood_group, units, donor_id).await?;
    txn.commit().await?;

    info!(
        "Donation recorded: {} unit(s) of {} (transaction {})",
        units, blood_group, entry.id
    );
    Ok(entry)
}

/// Issues `units` of `blood_group`, failing when the counter would go negative.
#[instrument(skip(db))]
pub async fn record_issue(
    db: &DatabaseConnection,
    blood_group: BloodGroup,
    units: i32,
) -> Result<stock_transaction::Model> {
    validate_units(units)?;

    let txn = db.begin().await?;

    let available = Stock::find()
        .filter(stock::Column::BloodGroup.eq(blood_group))
        .one(&txn)
        .await?
        .map(|row| row.units)
        .unwrap_or(0);
    debug!("{} has {} unit(s) available", blood_group, available);

    let insufficient = ComputeError::InsufficientStock {
        blood_group,
        available,
        requested: units,
    };
    if available < units {
        warn!("{}", insufficient);
        return Err(insufficient);
    }

    // The guard keeps the counter non-negative even if it moved since the read
    let updated = Stock::update_many()
        .col_expr(
            stock::Column::Units,
            Expr::col(stock::Column::Units).sub(units),
        )
        .filter(stock::Column::BloodGroup.eq(blood_group))
        .filter(stock::Column::Units.gte(units))
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        warn!("{}", insufficient);
        return Err(insufficient);
    }

    let entry = append_entry(&txn, TransactionKind::Issue, blood_group, units, None).await?;
    txn.commit().await?;

    info!(
        "Issue recorded: {} unit(s) of {} (transaction {})",
        units, blood_group, entry.id
    );
    Ok(entry)
}

/// Dispatches to [`record_donation`] or [`record_issue`].
///
/// Issues never carry a donor; a `donor_id` passed with an issue is ignored.
pub async fn record(
    db: &DatabaseConnection,
    kind: TransactionKind,
    blood_group: BloodGroup,
    units: i32,
    donor_id: Option<i32>,
) -> Result<stock_transaction::Model> {
    match kind {
        TransactionKind::Donation => record_donation(db, blood_group, units, donor_id).await,
        TransactionKind::Issue => record_issue(db, blood_group, units).await,
    }
}

async fn append_entry<C: ConnectionTrait>(
    db: &C,
    kind: TransactionKind,
    blood_group: BloodGroup,
    units: i32,
    donor_id: Option<i32>,
) -> Result<stock_transaction::Model> {
    let entry = stock_transaction::ActiveModel {
        donor_id: Set(donor_id),
        blood_group: Set(blood_group),
        units: Set(units),
        kind: Set(kind),
        created_at: Set(Local::now().naive_local()),
        ..Default::default()
    };
    Ok(entry.insert(db).await?)
}

/// Reads the log, newest entry first.
#[instrument(skip(db))]
pub async fn list_transactions(
    db: &DatabaseConnection,
    filter: &TransactionFilter,
) -> Result<Vec<stock_transaction::Model>> {
    let mut query = StockTransaction::find();

    if let Some(kind) = filter.kind {
        query = query.filter(stock_transaction::Column::Kind.eq(kind));
    }
    if let Some(group) = filter.blood_group {
        query = query.filter(stock_transaction::Column::BloodGroup.eq(group));
    }

    let entries = query
        .order_by_desc(stock_transaction::Column::CreatedAt)
        .order_by_desc(stock_transaction::Column::Id)
        .all(db)
        .await?;

    debug!("Loaded {} transaction(s)", entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{add_donor, setup_db, units_of};
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_donation_credits_stock_and_logs() {
        let db = setup_db().await;
        let donor = add_donor(&db, BloodGroup::OPositive).await;

        let entry = record_donation(&db, BloodGroup::OPositive, 3, Some(donor.id))
            .await
            .unwrap();

        assert_eq!(entry.kind, TransactionKind::Donation);
        assert_eq!(entry.units, 3);
        assert_eq!(entry.donor_id, Some(donor.id));
        assert_eq!(units_of(&db, BloodGroup::OPositive).await, 3);
        assert_eq!(units_of(&db, BloodGroup::ONegative).await, 0);
    }

    #[tokio::test]
    async fn test_donation_without_donor() {
        let db = setup_db().await;

        let entry = record_donation(&db, BloodGroup::AbNegative, 1, None).await.unwrap();

        assert_eq!(entry.donor_id, None);
        assert_eq!(units_of(&db, BloodGroup::AbNegative).await, 1);
    }

    #[tokio::test]
    async fn test_donation_with_unknown_donor_writes_nothing() {
        let db = setup_db().await;

        let result = record_donation(&db, BloodGroup::APositive, 2, Some(999)).await;

        assert!(matches!(result, Err(ComputeError::DonorNotFound(999))));
        assert_eq!(units_of(&db, BloodGroup::APositive).await, 0);
        assert_eq!(StockTransaction::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_zero_units_rejected() {
        let db = setup_db().await;

        assert!(matches!(
            record_donation(&db, BloodGroup::APositive, 0, None).await,
            Err(ComputeError::InvalidUnits(0))
        ));
        assert!(matches!(
            record_issue(&db, BloodGroup::APositive, -2).await,
            Err(ComputeError::InvalidUnits(-2))
        ));
    }

    #[tokio::test]
    async fn test_donation_beyond_counter_capacity_is_rejected() {
        let db = setup_db().await;
        record_donation(&db, BloodGroup::APositive, i32::MAX, None)
            .await
            .unwrap();

        let result = record_donation(&db, BloodGroup::APositive, 1, None).await;

        match result {
            Err(ComputeError::StockCapacityExceeded {
                blood_group,
                available,
                requested,
            }) => {
                assert_eq!(blood_group, BloodGroup::APositive);
                assert_eq!(available, i32::MAX);
                assert_eq!(requested, 1);
            }
            other => panic!("expected capacity error, got {:?}", other),
        }

        assert_eq!(units_of(&db, BloodGroup::APositive).await, i32::MAX);
        assert_eq!(StockTransaction::find().count(&db).await.unwrap(), 1);
        let issue = record_issue(&db, BloodGroup::APositive, 1).await.unwrap();
        assert_eq!(issue.units, 1);
        assert_eq!(units_of(&db, BloodGroup::APositive).await, i32::MAX - 1);
    }

    #[tokio::test]
    async fn test_issue_debits_stock() {
        let db = setup_db().await;
        record_donation(&db, BloodGroup::BNegative, 5, None).await.unwrap();

        let entry = record_issue(&db, BloodGroup::BNegative, 5).await.unwrap();

        assert_eq!(entry.kind, TransactionKind::Issue);
        assert_eq!(entry.donor_id, None);
        assert_eq!(units_of(&db, BloodGroup::BNegative).await, 0);
    }

    #[tokio::test]
    async fn test_issue_beyond_stock_is_rejected() {
        let db = setup_db().await;
        record_donation(&db, BloodGroup::APositive, 2, None).await.unwrap();

        let result = record_issue(&db, BloodGroup::APositive, 3).await;

        match result {
            Err(ComputeError::InsufficientStock {
                blood_group,
                available,
                requested,
            }) => {
                assert_eq!(blood_group, BloodGroup::APositive);
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("expected insufficient stock, got {:?}", other),
        }

        assert_eq!(units_of(&db, BloodGroup::APositive).await, 2);
        let issues = list_transactions(
            &db,
            &TransactionFilter {
                kind: Some(TransactionKind::Issue),
                blood_group: None,
            },
        )
        .await
        .unwrap();
        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn test_record_dispatches_on_kind() {
        let db = setup_db().await;

        record(&db, TransactionKind::Donation, BloodGroup::OPositive, 4, None)
            .await
            .unwrap();
        let issue = record(&db, TransactionKind::Issue, BloodGroup::OPositive, 1, Some(1))
            .await
            .unwrap();

        assert_eq!(issue.donor_id, None);
        assert_eq!(units_of(&db, BloodGroup::OPositive).await, 3);
    }

    #[tokio::test]
    async fn test_list_transactions_filters_and_orders() {
        let db = setup_db().await;
        record_donation(&db, BloodGroup::APositive, 4, None).await.unwrap();
        record_donation(&db, BloodGroup::BPositive, 2, None).await.unwrap();
        record_issue(&db, BloodGroup::APositive, 1).await.unwrap();

        let all = list_transactions(&db, &TransactionFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[0].id > all[1].id && all[1].id > all[2].id);

        let a_positive = list_transactions(
            &db,
            &TransactionFilter {
                kind: None,
                blood_group: Some(BloodGroup::APositive),
            },
        )
        .await
        .unwrap();
        assert_eq!(a_positive.len(), 2);

        let donations_a = list_transactions(
            &db,
            &TransactionFilter {
                kind: Some(TransactionKind::Donation),
                blood_group: Some(BloodGroup::APositive),
            },
        )
        .await
        .unwrap();
        assert_eq!(donations_a.len(), 1);
        assert_eq!(donations_a[0].units, 4);
    }
}
