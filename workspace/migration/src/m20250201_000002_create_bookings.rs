use crate::entity_iden::EntityIden;
use model::entities::booking;
use model::entities::prelude::*;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::table())
                    .if_not_exists()
                    .col(pk_auto(Booking::column(booking::Column::Id)))
                    .col(string(Booking::column(booking::Column::Username)))
                    .col(string(Booking::column(booking::Column::FullName)))
                    .col(string(Booking::column(booking::Column::Contact)))
                    .col(string_len(Booking::column(booking::Column::BloodGroup), 3))
                    .col(string(Booking::column(booking::Column::Center)))
                    .col(date(Booking::column(booking::Column::BookingDate)))
                    .col(string(Booking::column(booking::Column::BookingTime)))
                    .col(date_time(Booking::column(booking::Column::CreatedAt)))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_username")
                    .table(Booking::table())
                    .col(Booking::column(booking::Column::Username))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::table()).to_owned())
            .await
    }
}
