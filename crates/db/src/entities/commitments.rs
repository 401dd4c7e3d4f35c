//! `SeaORM` Entity for commitments table (tenant store).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::money::Money;
use super::sea_orm_active_enums::CommitmentStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commitments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub commit_number: String,
    pub due_date: Date,
    pub account: String,
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub amount: Money,
    #[sea_orm(indexed)]
    pub status: CommitmentStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
