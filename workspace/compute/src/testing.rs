//! Shared fixtures for the compute tests.

use migration::{Migrator, MigratorTrait};
use model::entities::prelude::*;
use model::entities::{BloodGroup, Gender, donor, stock};
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// In-memory SQLite with all migrations applied and stock seeded.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn add_donor(db: &DatabaseConnection, blood_group: BloodGroup) -> donor::Model {
    add_donor_with_gender(db, blood_group, Gender::Other).await
}

pub async fn add_donor_with_gender(
    db: &DatabaseConnection,
    blood_group: BloodGroup,
    gender: Gender,
) -> donor::Model {
    donor::ActiveModel {
        name: Set("Test Donor".to_string()),
        age: Set(35),
        gender: Set(gender),
        blood_group: Set(blood_group),
        contact: Set("555-0000".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert donor")
}

pub async fn units_of(db: &DatabaseConnection, blood_group: BloodGroup) -> i32 {
    Stock::find()
        .filter(stock::Column::BloodGroup.eq(blood_group))
        .one(db)
        .await
        .expect("Failed to read stock")
        .expect("Missing stock row")
        .units
}
