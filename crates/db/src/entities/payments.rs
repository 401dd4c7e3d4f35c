//! `SeaORM` Entity for payments table (tenant store).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::money::Money;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub commitment_id: i64,
    pub method: String,
    #[sea_orm(column_type = "Text")]
    pub amount: Money,
    pub payment_date: Date,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commitments::Entity",
        from = "Column::CommitmentId",
        to = "super::commitments::Column::Id",
        on_delete = "Restrict"
    )]
    Commitments,
}

impl Related<super::commitments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commitments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
