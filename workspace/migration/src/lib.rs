pub use sea_orm_migration::prelude::*;

pub mod entity_iden;
mod m20250101_000001_create_table;
mod m20250101_000002_seed_stock;
mod m20250201_000001_add_user_role;
mod m20250201_000002_create_bookings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_table::Migration),
            Box::new(m20250101_000002_seed_stock::Migration),
            Box::new(m20250201_000001_add_user_role::Migration),
            Box::new(m20250201_000002_create_bookings::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::entities::prelude::*;
    use model::entities::{stock, BloodGroup};
    use sea_orm::{ActiveModelTrait, Database, EntityTrait, PaginatorTrait, Set};

    #[tokio::test]
    async fn test_up_down_up() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        Migrator::up(&db, None).await.expect("first up failed");
        Migrator::down(&db, None).await.expect("down failed");
        Migrator::up(&db, None).await.expect("second up failed");

        assert_eq!(Stock::find().count(&db).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_seed_skips_populated_table() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        // Tables only, then a counter that already holds units
        Migrator::up(&db, Some(1)).await.unwrap();
        stock::ActiveModel {
            blood_group: Set(BloodGroup::APositive),
            units: Set(7),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        Migrator::up(&db, None).await.unwrap();

        let rows = Stock::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].units, 7);
    }
}
