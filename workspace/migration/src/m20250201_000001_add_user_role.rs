use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::user;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(User::table())
                    .add_column(
                        ColumnDef::new(User::column(user::Column::Role))
                            .string_len(10)
                            .not_null()
                            .default("User"),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(User::table())
                    .drop_column(User::column(user::Column::Role))
                    .to_owned(),
            )
            .await
    }
}
