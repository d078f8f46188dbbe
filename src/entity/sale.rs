use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A sale keeps the code by value, not by id: it belongs to whichever
/// code row matches the string when the ledger is read. Amounts are in
/// cents; `commission_cents` is computed once at insert and never
/// recomputed, even if the code's percentage changes later.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub code: String,
  pub amount_cents: i64,
  pub commission_cents: i64,
  pub recorded_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
