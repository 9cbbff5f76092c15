use sea_orm::entity::prelude::*;

use super::blood_group::BloodGroup;

/// A donation slot request submitted by a user.
///
/// Slots are stored as requested; there is no capacity or overlap check.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owner of the booking.
    pub username: String,
    pub full_name: String,
    pub contact: String,
    pub blood_group: BloodGroup,
    pub center: String,
    pub booking_date: Date,
    /// Free-form slot label, e.g. "09:00 AM".
    pub booking_time: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
