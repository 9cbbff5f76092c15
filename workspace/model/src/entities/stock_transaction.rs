use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::blood_group::BloodGroup;

/// Direction of a stock change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum TransactionKind {
    /// Units received from a donor; credits the stock.
    #[sea_orm(string_value = "Donation")]
    Donation,
    /// Units handed out; debits the stock.
    #[sea_orm(string_value = "Issue")]
    Issue,
}

/// Immutable log row describing one change to a stock counter.
///
/// `units` is always the positive magnitude; the sign comes from `kind`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Donor who gave the units. Always empty for issues.
    pub donor_id: Option<i32>,
    pub blood_group: BloodGroup,
    pub units: i32,
    pub kind: TransactionKind,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
