use sea_orm::sea_query::Expr;
use serde::Serialize;

use crate::{
  entity::{discount_code, influencer, sale},
  money,
  prelude::*,
  sv,
};

/// A code approved a moment before its first use may not yet be visible
/// to this read path. The lookup retries a bounded number of times with
/// a fixed delay; this tolerates the race, it does not prove it away.
pub const LOOKUP_ATTEMPTS: u32 = 5;
pub const LOOKUP_DELAY: Duration = Duration::from_millis(20);

pub struct Sale<'a> {
  db: &'a DatabaseConnection,
  lookup_attempts: u32,
  lookup_delay: Duration,
}

/// A committed sale plus the denormalized code/influencer metadata the
/// caller renders.
#[derive(Debug)]
pub struct RecordedSale {
  pub sale: sale::Model,
  pub discount_pct: i32,
  pub commission_pct: i32,
  pub influencer_name: String,
  pub influencer_email: String,
}

#[derive(Debug, Serialize)]
pub struct SaleView {
  pub code: String,
  pub total_amount: Decimal,
  pub commission: Decimal,
  pub recorded_at: DateTime,
}

impl From<sale::Model> for SaleView {
  fn from(sale: sale::Model) -> Self {
    Self {
      code: sale.code,
      total_amount: money::from_cents(sale.amount_cents),
      commission: money::from_cents(sale.commission_cents),
      recorded_at: sale.recorded_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct SaleStats {
  pub total_sales: u64,
  pub total_revenue: Decimal,
  pub total_commission: Decimal,
  pub avg_sale: Decimal,
}

impl<'a> Sale<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db, lookup_attempts: LOOKUP_ATTEMPTS, lookup_delay: LOOKUP_DELAY }
  }

  pub fn with_retry(
    db: &'a DatabaseConnection,
    attempts: u32,
    delay: Duration,
  ) -> Self {
    Self { db, lookup_attempts: attempts.max(1), lookup_delay: delay }
  }

  pub async fn record(
    &self,
    code: &str,
    amount: Decimal,
  ) -> Result<RecordedSale> {
    let normalized = sv::code::normalize(code);
    if normalized.is_empty() {
      return Err(Error::InvalidArgs("Code is required".into()));
    }
    let amount_cents = money::to_cents(amount)?;

    let Some(code) = self.lookup_with_retry(&normalized).await? else {
      warn!(
        code = %normalized,
        attempts = self.lookup_attempts,
        "no active code after retry budget"
      );
      return Err(Error::CodeNotFound);
    };

    let influencer = influencer::Entity::find_by_id(code.influencer_id)
      .one(self.db)
      .await?
      .ok_or(Error::InfluencerNotFound)?;

    let commission_cents =
      money::commission_cents(amount_cents, code.commission_pct);

    let now = Utc::now().naive_utc();
    let sale = sale::ActiveModel {
      id: NotSet,
      code: Set(code.code.clone()),
      amount_cents: Set(amount_cents),
      commission_cents: Set(commission_cents),
      recorded_at: Set(now),
    }
    .insert(self.db)
    .await?;

    debug!(sale = sale.id, code = %sale.code, "recorded sale");

    Ok(RecordedSale {
      sale,
      discount_pct: code.discount_pct,
      commission_pct: code.commission_pct,
      influencer_name: influencer.name,
      influencer_email: influencer.email,
    })
  }

  pub async fn list(
    &self,
    code: Option<&str>,
    page: u64,
    limit: u64,
  ) -> Result<(Vec<sale::Model>, u64)> {
    let mut query =
      sale::Entity::find().order_by_desc(sale::Column::RecordedAt);
    if let Some(code) = code {
      query = query.filter(sale::Column::Code.eq(sv::code::normalize(code)));
    }

    let paginator = query.paginate(self.db, limit);
    let total = paginator.num_items().await?;
    let sales = paginator.fetch_page(page).await?;

    Ok((sales, total))
  }

  pub async fn stats(&self) -> Result<SaleStats> {
    type Row = (Option<i64>, Option<i64>, Option<i64>);
    let row: Option<Row> = sale::Entity::find()
      .select_only()
      .column_as(Expr::col(sale::Column::Id).count(), "count")
      .column_as(Expr::col(sale::Column::AmountCents).sum(), "revenue")
      .column_as(Expr::col(sale::Column::CommissionCents).sum(), "commission")
      .into_tuple()
      .one(self.db)
      .await?;

    let count = row.and_then(|r| r.0).unwrap_or(0);
    let revenue = row.and_then(|r| r.1).unwrap_or(0);
    let commission = row.and_then(|r| r.2).unwrap_or(0);

    Ok(SaleStats {
      total_sales: count as u64,
      total_revenue: money::from_cents(revenue),
      total_commission: money::from_cents(commission),
      avg_sale: money::from_cents(money::average_cents(revenue, count)),
    })
  }

  async fn lookup_with_retry(
    &self,
    code: &str,
  ) -> Result<Option<discount_code::Model>> {
    for attempt in 0..self.lookup_attempts {
      if attempt > 0 {
        tokio::time::sleep(self.lookup_delay).await;
      }
      if let Some(found) = sv::Code::new(self.db).lookup_active(code).await? {
        return Ok(Some(found));
      }
    }
    Ok(None)
  }
}
