use sea_orm::entity::prelude::*;

use super::blood_group::{BloodGroup, Gender};

/// An entry in the donor registry.
///
/// Donors are managed by staff and are not linked to user accounts.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "donors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub contact: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
