use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string(Users::FullName))
                    .col(integer(Users::Age))
                    .col(string_len(Users::Gender, 10))
                    .col(string(Users::Contact))
                    .to_owned(),
            )
            .await?;

        // Create donors table
        manager
            .create_table(
                Table::create()
                    .table(Donors::Table)
                    .if_not_exists()
                    .col(pk_auto(Donors::Id))
                    .col(string(Donors::Name))
                    .col(integer(Donors::Age))
                    .col(string_len(Donors::Gender, 10))
                    .col(string_len(Donors::BloodGroup, 3))
                    .col(string(Donors::Contact))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_donors_blood_group")
                    .table(Donors::Table)
                    .col(Donors::BloodGroup)
                    .to_owned(),
            )
            .await?;

        // Create stock table, one row per blood group
        manager
            .create_table(
                Table::create()
                    .table(Stock::Table)
                    .if_not_exists()
                    .col(pk_auto(Stock::Id))
                    .col(string_len(Stock::BloodGroup, 3).unique_key())
                    .col(integer(Stock::Units).default(0))
                    .to_owned(),
            )
            .await?;

        // Create transactions table (append-only log)
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(integer_null(Transactions::DonorId))
                    .col(string_len(Transactions::BloodGroup, 3))
                    .col(integer(Transactions::Units))
                    .col(string_len(Transactions::Kind, 10))
                    .col(date_time(Transactions::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stock::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Donors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    FullName,
    Age,
    Gender,
    Contact,
}

#[derive(DeriveIden)]
enum Donors {
    Table,
    Id,
    Name,
    Age,
    Gender,
    BloodGroup,
    Contact,
}

#[derive(DeriveIden)]
enum Stock {
    Table,
    Id,
    BloodGroup,
    Units,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    DonorId,
    BloodGroup,
    Units,
    Kind,
    CreatedAt,
}
