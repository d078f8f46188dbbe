use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{influencer, payout};

/// Immutable ledger entry written in the same transaction that marks a
/// payout completed. The balance snapshots are never re-derived from the
/// current balance afterwards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settlements")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  #[sea_orm(unique)]
  pub payout_id: i32,
  pub influencer_id: i64,
  pub amount_cents: i64,
  pub balance_before_cents: i64,
  pub balance_after_cents: i64,
  pub settled_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "payout::Entity",
    from = "Column::PayoutId",
    to = "payout::Column::Id"
  )]
  Payout,
  #[sea_orm(
    belongs_to = "influencer::Entity",
    from = "Column::InfluencerId",
    to = "influencer::Column::Id"
  )]
  Influencer,
}

impl Related<payout::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Payout.def()
  }
}

impl Related<influencer::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Influencer.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
