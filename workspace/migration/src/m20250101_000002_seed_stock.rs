use model::entities::prelude::*;
use model::entities::{stock, BloodGroup};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // Only seed an empty table so existing counters are never reset
        if Stock::find().count(db).await? > 0 {
            return Ok(());
        }

        for group in BloodGroup::ALL {
            stock::ActiveModel {
                blood_group: Set(group),
                units: Set(0),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        Stock::delete_many().exec(db).await?;
        Ok(())
    }
}
