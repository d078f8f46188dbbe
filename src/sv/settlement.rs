use serde::Serialize;

use crate::{
  entity::{PayoutStatus, influencer, payout, settlement},
  money,
  prelude::*,
};

/// Read-only projection over the persisted settlement rows. The
/// before/after snapshots were written when the payout completed and are
/// never re-derived from the current balance.
pub struct Settlement<'a> {
  db: &'a DatabaseConnection,
}

#[derive(Debug, Serialize)]
pub struct SettlementEntry {
  pub payout_id: i32,
  pub influencer_id: i64,
  pub amount: Decimal,
  pub iban: String,
  pub status: PayoutStatus,
  pub note: Option<String>,
  pub balance_before: Decimal,
  pub balance_after: Decimal,
  pub settled_at: DateTime,
}

impl<'a> Settlement<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn history(
    &self,
    influencer_id: i64,
  ) -> Result<Vec<SettlementEntry>> {
    influencer::Entity::find_by_id(influencer_id)
      .one(self.db)
      .await?
      .ok_or(Error::InfluencerNotFound)?;

    let rows = settlement::Entity::find()
      .filter(settlement::Column::InfluencerId.eq(influencer_id))
      .order_by_asc(settlement::Column::SettledAt)
      .find_also_related(payout::Entity)
      .all(self.db)
      .await?;

    rows.into_iter().map(Self::entry).collect()
  }

  pub async fn all(&self) -> Result<Vec<SettlementEntry>> {
    let rows = settlement::Entity::find()
      .order_by_asc(settlement::Column::SettledAt)
      .find_also_related(payout::Entity)
      .all(self.db)
      .await?;

    rows.into_iter().map(Self::entry).collect()
  }

  fn entry(
    row: (settlement::Model, Option<payout::Model>),
  ) -> Result<SettlementEntry> {
    let (settlement, payout) = row;
    let payout = payout.ok_or_else(|| {
      Error::Internal(format!(
        "settlement {} has no payout row",
        settlement.id
      ))
    })?;

    Ok(SettlementEntry {
      payout_id: settlement.payout_id,
      influencer_id: settlement.influencer_id,
      amount: money::from_cents(settlement.amount_cents),
      iban: payout.iban,
      status: payout.status,
      note: payout.note,
      balance_before: money::from_cents(settlement.balance_before_cents),
      balance_after: money::from_cents(settlement.balance_after_cents),
      settled_at: settlement.settled_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal_macros::dec;

  use super::*;
  use crate::sv::{Code, Influencer, Payout, Sale, test_utils::test_db};

  const IBAN: &str = "DE02120300000000202051";

  #[tokio::test]
  async fn test_snapshots_follow_chronology() {
    let db = test_db::setup().await;
    let inf =
      Influencer::new(&db).create("Maria", "maria@example.com").await.unwrap();
    Code::new(&db)
      .create(inf.id, Some("SUMMER10"), 10, 40, true)
      .await
      .unwrap();
    Sale::new(&db).record("SUMMER10", dec!(1000)).await.unwrap();

    let sv = Payout::new(&db);
    let first = sv.create(inf.id, dec!(150), IBAN, None, None).await.unwrap();
    sv.set_status(first.id, "completed").await.unwrap();
    let second = sv.create(inf.id, dec!(100), IBAN, None, None).await.unwrap();
    sv.set_status(second.id, "completed").await.unwrap();

    let history = Settlement::new(&db).history(inf.id).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].balance_before, dec!(400.00));
    assert_eq!(history[0].balance_after, dec!(250.00));
    assert_eq!(history[1].balance_before, dec!(250.00));
    assert_eq!(history[1].balance_after, dec!(150.00));
  }

  #[tokio::test]
  async fn test_snapshots_are_immutable_under_new_sales() {
    let db = test_db::setup().await;
    let inf =
      Influencer::new(&db).create("Maria", "maria@example.com").await.unwrap();
    Code::new(&db)
      .create(inf.id, Some("SUMMER10"), 10, 40, true)
      .await
      .unwrap();
    Sale::new(&db).record("SUMMER10", dec!(1000)).await.unwrap();

    let sv = Payout::new(&db);
    let payout = sv.create(inf.id, dec!(150), IBAN, None, None).await.unwrap();
    sv.set_status(payout.id, "completed").await.unwrap();

    // The current balance moves on; the snapshot must not.
    Sale::new(&db).record("SUMMER10", dec!(500)).await.unwrap();

    let history = Settlement::new(&db).history(inf.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].balance_before, dec!(400.00));
    assert_eq!(history[0].balance_after, dec!(250.00));
    assert_eq!(history[0].status, PayoutStatus::Completed);
  }

  #[tokio::test]
  async fn test_history_requires_known_influencer() {
    let db = test_db::setup().await;

    let result = Settlement::new(&db).history(999).await;

    assert!(matches!(result, Err(Error::InfluencerNotFound)));
  }

  #[tokio::test]
  async fn test_incomplete_payouts_have_no_entry() {
    let db = test_db::setup().await;
    let inf =
      Influencer::new(&db).create("Maria", "maria@example.com").await.unwrap();
    Code::new(&db)
      .create(inf.id, Some("SUMMER10"), 10, 40, true)
      .await
      .unwrap();
    Sale::new(&db).record("SUMMER10", dec!(1000)).await.unwrap();

    let sv = Payout::new(&db);
    sv.create(inf.id, dec!(150), IBAN, None, None).await.unwrap();

    let history = Settlement::new(&db).history(inf.id).await.unwrap();
    assert!(history.is_empty());
  }
}
