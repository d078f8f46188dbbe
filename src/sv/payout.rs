use crate::{
  entity::{PayoutStatus, influencer, payout, settlement},
  money,
  prelude::*,
  sv::Ledger,
};

pub struct Payout<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Payout<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// The available balance is computed inside the same transaction that
  /// creates the payout; pending/processing payouts count as reserved.
  pub async fn create(
    &self,
    influencer_id: i64,
    amount: Decimal,
    iban: &str,
    note: Option<String>,
    status: Option<PayoutStatus>,
  ) -> Result<payout::Model> {
    let amount_cents = money::to_cents(amount)?;
    let iban = iban.trim();
    if iban.is_empty() {
      return Err(Error::InvalidArgs("IBAN is required".into()));
    }
    let status = status.unwrap_or_default();

    let txn = self.db.begin().await?;

    influencer::Entity::find_by_id(influencer_id)
      .one(&txn)
      .await?
      .ok_or(Error::InfluencerNotFound)?;

    let available = Ledger::available_with(&txn, influencer_id).await?;
    if amount_cents > available {
      return Err(Error::InsufficientBalance);
    }

    let now = Utc::now().naive_utc();
    let completed = status == PayoutStatus::Completed;

    let balance_before = if completed {
      Some(Ledger::balance_with(&txn, influencer_id).await?)
    } else {
      None
    };

    let model = payout::ActiveModel {
      id: NotSet,
      influencer_id: Set(influencer_id),
      amount_cents: Set(amount_cents),
      iban: Set(iban.to_string()),
      status: Set(status),
      note: Set(note),
      created_at: Set(now),
      updated_at: Set(now),
      completed_at: Set(completed.then_some(now)),
    }
    .insert(&txn)
    .await?;

    if let Some(before) = balance_before {
      Self::settle(&txn, &model, before, now).await?;
    }

    txn.commit().await?;

    info!(
      payout = model.id,
      influencer = influencer_id,
      status = model.status.as_str(),
      "created payout"
    );
    Ok(model)
  }

  /// Validates the requested status against the transition table. The
  /// move to `completed` writes the settlement snapshot in the same
  /// transaction. Re-asserting the current status is a no-op.
  pub async fn set_status(
    &self,
    payout_id: i32,
    status: &str,
  ) -> Result<payout::Model> {
    let target = PayoutStatus::parse(status)
      .ok_or_else(|| Error::InvalidStatus(status.to_string()))?;

    let txn = self.db.begin().await?;

    let current = payout::Entity::find_by_id(payout_id)
      .one(&txn)
      .await?
      .ok_or(Error::PayoutNotFound)?;

    if current.status == target {
      return Ok(current);
    }

    if !current.status.can_transition(target) {
      warn!(
        payout = payout_id,
        from = current.status.as_str(),
        to = target.as_str(),
        "rejected payout transition"
      );
      return Err(Error::IllegalTransition {
        from: current.status.as_str(),
        to: target.as_str(),
      });
    }

    let now = Utc::now().naive_utc();

    if target == PayoutStatus::Completed {
      // Snapshot before this payout is deducted; the row it produces is
      // immutable.
      let before = Ledger::balance_with(&txn, current.influencer_id).await?;
      Self::settle(&txn, &current, before, now).await?;
    }

    let mut active: payout::ActiveModel = current.clone().into();
    active.status = Set(target);
    active.updated_at = Set(now);
    if target == PayoutStatus::Completed {
      active.completed_at = Set(Some(now));
    }
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!(
      payout = payout_id,
      from = current.status.as_str(),
      to = target.as_str(),
      "payout transitioned"
    );
    Ok(updated)
  }

  #[allow(dead_code)]
  pub async fn by_id(&self, payout_id: i32) -> Result<Option<payout::Model>> {
    Ok(payout::Entity::find_by_id(payout_id).one(self.db).await?)
  }

  pub async fn list(
    &self,
    status: Option<PayoutStatus>,
    page: u64,
    limit: u64,
  ) -> Result<(Vec<payout::Model>, u64)> {
    let mut query =
      payout::Entity::find().order_by_desc(payout::Column::CreatedAt);
    if let Some(status) = status {
      query = query.filter(payout::Column::Status.eq(status));
    }

    let paginator = query.paginate(self.db, limit);
    let total = paginator.num_items().await?;
    let payouts = paginator.fetch_page(page).await?;

    Ok((payouts, total))
  }

  async fn settle<C: ConnectionTrait>(
    conn: &C,
    payout: &payout::Model,
    balance_before: i64,
    now: DateTime,
  ) -> Result<settlement::Model> {
    Ok(
      settlement::ActiveModel {
        id: NotSet,
        payout_id: Set(payout.id),
        influencer_id: Set(payout.influencer_id),
        amount_cents: Set(payout.amount_cents),
        balance_before_cents: Set(balance_before),
        balance_after_cents: Set(balance_before - payout.amount_cents),
        settled_at: Set(now),
      }
      .insert(conn)
      .await?,
    )
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal_macros::dec;

  use super::*;
  use crate::{
    entity::settlement,
    sv::{Code, Influencer, Sale, test_utils::test_db},
  };

  const IBAN: &str = "DE02120300000000202051";

  async fn funded(db: &DatabaseConnection, amount: Decimal) -> i64 {
    let inf =
      Influencer::new(db).create("Maria", "maria@example.com").await.unwrap();
    Code::new(db)
      .create(inf.id, Some("SUMMER10"), 10, 40, true)
      .await
      .unwrap();
    Sale::new(db).record("SUMMER10", amount).await.unwrap();
    inf.id
  }

  #[tokio::test]
  async fn test_create_defaults_to_pending() {
    let db = test_db::setup().await;
    let inf = funded(&db, dec!(1000)).await;

    let payout = Payout::new(&db)
      .create(inf, dec!(100), IBAN, Some("march".into()), None)
      .await
      .unwrap();

    assert_eq!(payout.status, PayoutStatus::Pending);
    assert_eq!(payout.amount_cents, 10_000);
    assert!(payout.completed_at.is_none());
  }

  #[tokio::test]
  async fn test_create_validations() {
    let db = test_db::setup().await;
    let inf = funded(&db, dec!(1000)).await;
    let sv = Payout::new(&db);

    assert!(matches!(
      sv.create(inf, dec!(0), IBAN, None, None).await,
      Err(Error::InvalidArgs(_))
    ));
    assert!(matches!(
      sv.create(inf, dec!(10), "  ", None, None).await,
      Err(Error::InvalidArgs(_))
    ));
    assert!(matches!(
      sv.create(999, dec!(10), IBAN, None, None).await,
      Err(Error::InfluencerNotFound)
    ));
  }

  #[tokio::test]
  async fn test_amount_capped_by_balance() {
    let db = test_db::setup().await;
    // 40% of 1000.00 -> 400.00 earned
    let inf = funded(&db, dec!(1000)).await;

    let result =
      Payout::new(&db).create(inf, dec!(400.01), IBAN, None, None).await;

    assert!(matches!(result, Err(Error::InsufficientBalance)));
  }

  #[tokio::test]
  async fn test_pending_payouts_reserve_balance() {
    let db = test_db::setup().await;
    let inf = funded(&db, dec!(1000)).await;
    let sv = Payout::new(&db);

    sv.create(inf, dec!(300), IBAN, None, None).await.unwrap();

    // 100.00 left after the reservation; a second 300.00 must not fit.
    let result = sv.create(inf, dec!(300), IBAN, None, None).await;
    assert!(matches!(result, Err(Error::InsufficientBalance)));

    assert!(sv.create(inf, dec!(100), IBAN, None, None).await.is_ok());
  }

  #[tokio::test]
  async fn test_unknown_status_rejected() {
    let db = test_db::setup().await;
    let inf = funded(&db, dec!(1000)).await;
    let sv = Payout::new(&db);

    let payout = sv.create(inf, dec!(100), IBAN, None, None).await.unwrap();

    let result = sv.set_status(payout.id, "paid").await;
    assert!(matches!(result, Err(Error::InvalidStatus(_))));
  }

  #[tokio::test]
  async fn test_terminal_states_reject_moves() {
    let db = test_db::setup().await;
    let inf = funded(&db, dec!(1000)).await;
    let sv = Payout::new(&db);

    let payout = sv.create(inf, dec!(100), IBAN, None, None).await.unwrap();
    sv.set_status(payout.id, "completed").await.unwrap();

    let result = sv.set_status(payout.id, "pending").await;
    assert!(matches!(result, Err(Error::IllegalTransition { .. })));

    let result = sv.set_status(payout.id, "processing").await;
    assert!(matches!(result, Err(Error::IllegalTransition { .. })));
  }

  #[tokio::test]
  async fn test_same_status_is_noop() {
    let db = test_db::setup().await;
    let inf = funded(&db, dec!(1000)).await;
    let sv = Payout::new(&db);

    let payout = sv.create(inf, dec!(100), IBAN, None, None).await.unwrap();
    let unchanged = sv.set_status(payout.id, "pending").await.unwrap();

    assert_eq!(unchanged.status, PayoutStatus::Pending);
  }

  #[tokio::test]
  async fn test_completion_writes_settlement_snapshot() {
    let db = test_db::setup().await;
    let inf = funded(&db, dec!(1000)).await;
    let sv = Payout::new(&db);

    let payout = sv.create(inf, dec!(150), IBAN, None, None).await.unwrap();
    sv.set_status(payout.id, "processing").await.unwrap();
    let completed = sv.set_status(payout.id, "completed").await.unwrap();

    assert_eq!(completed.status, PayoutStatus::Completed);
    assert!(completed.completed_at.is_some());

    let snapshot = settlement::Entity::find()
      .filter(settlement::Column::PayoutId.eq(payout.id))
      .one(&db)
      .await
      .unwrap()
      .unwrap();

    assert_eq!(snapshot.balance_before_cents, 40_000);
    assert_eq!(snapshot.balance_after_cents, 25_000);
    assert_eq!(snapshot.amount_cents, 15_000);
  }

  #[tokio::test]
  async fn test_failed_payout_releases_reservation() {
    let db = test_db::setup().await;
    let inf = funded(&db, dec!(1000)).await;
    let sv = Payout::new(&db);

    let payout = sv.create(inf, dec!(400), IBAN, None, None).await.unwrap();
    assert!(matches!(
      sv.create(inf, dec!(100), IBAN, None, None).await,
      Err(Error::InsufficientBalance)
    ));

    sv.set_status(payout.id, "failed").await.unwrap();

    assert!(sv.create(inf, dec!(100), IBAN, None, None).await.is_ok());

    // no settlement for a failed payout
    let snapshot = settlement::Entity::find()
      .filter(settlement::Column::PayoutId.eq(payout.id))
      .one(&db)
      .await
      .unwrap();
    assert!(snapshot.is_none());
  }

  #[tokio::test]
  async fn test_create_directly_completed_settles() {
    let db = test_db::setup().await;
    let inf = funded(&db, dec!(1000)).await;

    let payout = Payout::new(&db)
      .create(inf, dec!(100), IBAN, None, Some(PayoutStatus::Completed))
      .await
      .unwrap();

    assert!(payout.completed_at.is_some());

    let snapshot = settlement::Entity::find()
      .filter(settlement::Column::PayoutId.eq(payout.id))
      .one(&db)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(snapshot.balance_before_cents, 40_000);
    assert_eq!(snapshot.balance_after_cents, 30_000);
  }
}
