use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::influencer;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
  #[sea_orm(string_value = "pending")]
  #[default]
  Pending,
  #[sea_orm(string_value = "processing")]
  Processing,
  #[sea_orm(string_value = "completed")]
  Completed,
  #[sea_orm(string_value = "failed")]
  Failed,
}

impl PayoutStatus {
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "pending" => Some(Self::Pending),
      "processing" => Some(Self::Processing),
      "completed" => Some(Self::Completed),
      "failed" => Some(Self::Failed),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Processing => "processing",
      Self::Completed => "completed",
      Self::Failed => "failed",
    }
  }

  /// Allowed moves: pending -> processing | completed | failed,
  /// processing -> completed | failed. Terminal states stay terminal.
  pub fn can_transition(self, to: Self) -> bool {
    use PayoutStatus::*;
    matches!(
      (self, to),
      (Pending, Processing | Completed | Failed) | (Processing, Completed | Failed)
    )
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payouts")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub influencer_id: i64,
  pub amount_cents: i64,
  pub iban: String,
  pub status: PayoutStatus,
  pub note: Option<String>,
  pub created_at: DateTime,
  pub updated_at: DateTime,
  pub completed_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "influencer::Entity",
    from = "Column::InfluencerId",
    to = "influencer::Column::Id"
  )]
  Influencer,
  #[sea_orm(has_one = "super::settlement::Entity")]
  Settlement,
}

impl Related<influencer::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Influencer.def()
  }
}

impl Related<super::settlement::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Settlement.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
  use super::{PayoutStatus, PayoutStatus::*};

  #[test]
  fn forward_moves_allowed() {
    assert!(Pending.can_transition(Processing));
    assert!(Pending.can_transition(Completed));
    assert!(Pending.can_transition(Failed));
    assert!(Processing.can_transition(Completed));
    assert!(Processing.can_transition(Failed));
  }

  #[test]
  fn terminal_states_locked() {
    assert!(!Completed.can_transition(Pending));
    assert!(!Completed.can_transition(Processing));
    assert!(!Completed.can_transition(Failed));
    assert!(!Failed.can_transition(Pending));
    assert!(!Failed.can_transition(Completed));
  }

  #[test]
  fn no_backward_moves() {
    assert!(!Processing.can_transition(Pending));
    assert!(!Pending.can_transition(Pending));
  }

  #[test]
  fn parse_known_values_only() {
    assert_eq!(PayoutStatus::parse("completed"), Some(Completed));
    assert_eq!(PayoutStatus::parse("paid"), None);
    assert_eq!(PayoutStatus::parse("Completed"), None);
  }
}
