use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::influencer;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "discount_codes")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  /// Stored upper-cased; compared upper-cased everywhere.
  #[sea_orm(unique)]
  pub code: String,
  pub influencer_id: i64,
  pub discount_pct: i32,
  pub commission_pct: i32,
  pub is_active: bool,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "influencer::Entity",
    from = "Column::InfluencerId",
    to = "influencer::Column::Id"
  )]
  Influencer,
}

impl Related<influencer::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Influencer.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
