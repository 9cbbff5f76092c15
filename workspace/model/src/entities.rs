//! SeaORM entities of the blood bank.
//!
//! Every table is a flat record; cross-table consistency (for example the
//! stock counters against the transaction log) is not enforced here.

pub mod blood_group;
pub mod booking;
pub mod donor;
pub mod stock;
pub mod stock_transaction;
pub mod user;

pub use blood_group::{BloodGroup, Gender, UnknownBloodGroup};
pub use stock_transaction::TransactionKind;
pub use user::UserRole;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::booking::Entity as Booking;
    pub use super::donor::Entity as Donor;
    pub use super::stock::Entity as Stock;
    pub use super::stock_transaction::Entity as StockTransaction;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::{NaiveDate, Utc};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait,
        PaginatorTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_stock_is_seeded_for_every_group() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let rows = Stock::find().all(&db).await?;
        assert_eq!(rows.len(), BloodGroup::ALL.len());
        assert!(rows.iter().all(|row| row.units == 0));

        for group in BloodGroup::ALL {
            let row = Stock::find()
                .filter(stock::Column::BloodGroup.eq(group))
                .one(&db)
                .await?;
            assert!(row.is_some(), "missing stock row for {}", group);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let user = user::ActiveModel {
            username: Set("alice".to_string()),
            password_hash: Set("salt$hash".to_string()),
            full_name: Set("Alice Doe".to_string()),
            age: Set(30),
            gender: Set(Gender::Female),
            contact: Set("555-0100".to_string()),
            role: Set(UserRole::User),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert_eq!(user.role, UserRole::User);

        let donor = donor::ActiveModel {
            name: Set("Bob Roe".to_string()),
            age: Set(41),
            gender: Set(Gender::Male),
            blood_group: Set(BloodGroup::ONegative),
            contact: Set("555-0101".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let now = Utc::now().naive_local();
        let transaction = stock_transaction::ActiveModel {
            donor_id: Set(Some(donor.id)),
            blood_group: Set(BloodGroup::ONegative),
            units: Set(2),
            kind: Set(TransactionKind::Donation),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert_eq!(transaction.kind, TransactionKind::Donation);
        assert_eq!(transaction.donor_id, Some(donor.id));

        let booking = booking::ActiveModel {
            username: Set(user.username.clone()),
            full_name: Set(user.full_name.clone()),
            contact: Set(user.contact.clone()),
            blood_group: Set(BloodGroup::APositive),
            center: Set("City Hall".to_string()),
            booking_date: Set(NaiveDate::from_ymd_opt(2030, 11, 1).unwrap()),
            booking_time: Set("10:00 AM".to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let found = Booking::find_by_id(booking.id).one(&db).await?.unwrap();
        assert_eq!(found.center, "City Hall");
        assert_eq!(found.booking_time, "10:00 AM");

        let donations = StockTransaction::find()
            .filter(stock_transaction::Column::Kind.eq(TransactionKind::Donation))
            .count(&db)
            .await?;
        assert_eq!(donations, 1);

        assert_eq!(Donor::find().count(&db).await?, 1);
        assert_eq!(User::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let new_user = || user::ActiveModel {
            username: Set("dup".to_string()),
            password_hash: Set("salt$hash".to_string()),
            full_name: Set("Dup".to_string()),
            age: Set(20),
            gender: Set(Gender::Other),
            contact: Set("x".to_string()),
            role: Set(UserRole::User),
            ..Default::default()
        };

        new_user().insert(&db).await?;
        assert!(new_user().insert(&db).await.is_err());

        Ok(())
    }
}
