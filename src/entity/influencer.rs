use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{discount_code, payout, settlement};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "influencers")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i64,
  pub name: String,
  #[sea_orm(unique)]
  pub email: String,
  pub is_approved: bool,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "discount_code::Entity")]
  Codes,
  #[sea_orm(has_many = "payout::Entity")]
  Payouts,
  #[sea_orm(has_many = "settlement::Entity")]
  Settlements,
}

impl Related<discount_code::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Codes.def()
  }
}

impl Related<payout::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Payouts.def()
  }
}

impl Related<settlement::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Settlements.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
