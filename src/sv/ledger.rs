use std::collections::BTreeMap;

use sea_orm::sea_query::Expr;
use serde::Serialize;

use crate::{
  entity::{PayoutStatus, discount_code, influencer, payout, sale},
  money,
  prelude::*,
  sv::sale::SaleView,
};

/// The balance is never stored: it is recomputed from sales and payouts
/// on every read.
pub struct Ledger<'a> {
  db: &'a DatabaseConnection,
}

const RECENT_SALES: usize = 10;

#[derive(Debug, Serialize)]
pub struct BalanceBlock {
  pub total_sales: u64,
  pub total_revenue: Decimal,
  pub total_commission: Decimal,
  pub pending_commission: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MonthlyStat {
  pub month: String,
  pub count: u64,
  pub revenue: Decimal,
  pub commission: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CodeStat {
  pub code: String,
  pub count: u64,
  pub revenue: Decimal,
  pub commission: Decimal,
  pub avg_sale: Decimal,
}

#[derive(Debug, Serialize)]
pub struct LedgerReport {
  pub balance: BalanceBlock,
  pub monthly_stats: Vec<MonthlyStat>,
  pub code_stats: Vec<CodeStat>,
  pub recent_sales: Vec<SaleView>,
}

#[derive(Debug, Serialize)]
pub struct InfluencerSummary {
  pub influencer_id: i64,
  pub name: String,
  pub email: String,
  pub is_approved: bool,
  pub total_sales: u64,
  pub total_revenue: Decimal,
  pub total_commission: Decimal,
  pub total_paid: Decimal,
  pub balance: Decimal,
}

impl<'a> Ledger<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Earned commission minus completed payouts. Pending/processing
  /// payouts do not reduce the reported balance; over-committal is
  /// prevented at payout creation instead.
  pub async fn balance_cents(&self, influencer_id: i64) -> Result<i64> {
    influencer::Entity::find_by_id(influencer_id)
      .one(self.db)
      .await?
      .ok_or(Error::InfluencerNotFound)?;

    Self::balance_with(self.db, influencer_id).await
  }

  pub async fn report(&self, influencer_id: i64) -> Result<LedgerReport> {
    influencer::Entity::find_by_id(influencer_id)
      .one(self.db)
      .await?
      .ok_or(Error::InfluencerNotFound)?;

    let codes = Self::code_strings(self.db, influencer_id).await?;
    let sales = if codes.is_empty() {
      Vec::new()
    } else {
      sale::Entity::find()
        .filter(sale::Column::Code.is_in(codes))
        .order_by_desc(sale::Column::RecordedAt)
        .all(self.db)
        .await?
    };

    let total_revenue: i64 = sales.iter().map(|s| s.amount_cents).sum();
    let total_commission: i64 = sales.iter().map(|s| s.commission_cents).sum();
    let paid = Self::payout_total(
      self.db,
      influencer_id,
      &[PayoutStatus::Completed],
    )
    .await?;

    let mut monthly: BTreeMap<String, (u64, i64, i64)> = BTreeMap::new();
    let mut per_code: BTreeMap<String, (u64, i64, i64)> = BTreeMap::new();
    for sale in &sales {
      let month = sale.recorded_at.format("%Y-%m").to_string();
      let entry = monthly.entry(month).or_default();
      entry.0 += 1;
      entry.1 += sale.amount_cents;
      entry.2 += sale.commission_cents;

      let entry = per_code.entry(sale.code.clone()).or_default();
      entry.0 += 1;
      entry.1 += sale.amount_cents;
      entry.2 += sale.commission_cents;
    }

    let monthly_stats = monthly
      .into_iter()
      .map(|(month, (count, revenue, commission))| MonthlyStat {
        month,
        count,
        revenue: money::from_cents(revenue),
        commission: money::from_cents(commission),
      })
      .collect();

    let code_stats = per_code
      .into_iter()
      .map(|(code, (count, revenue, commission))| CodeStat {
        code,
        count,
        revenue: money::from_cents(revenue),
        commission: money::from_cents(commission),
        avg_sale: money::from_cents(money::average_cents(
          revenue,
          count as i64,
        )),
      })
      .collect();

    let recent_sales =
      sales.iter().take(RECENT_SALES).cloned().map(SaleView::from).collect();

    Ok(LedgerReport {
      balance: BalanceBlock {
        total_sales: sales.len() as u64,
        total_revenue: money::from_cents(total_revenue),
        total_commission: money::from_cents(total_commission),
        pending_commission: money::from_cents(total_commission - paid),
      },
      monthly_stats,
      code_stats,
      recent_sales,
    })
  }

  /// Cross-influencer aggregate for the admin overview.
  pub async fn global_summary(
    &self,
    approved: Option<bool>,
    page: u64,
    limit: u64,
  ) -> Result<(Vec<InfluencerSummary>, u64)> {
    let mut query =
      influencer::Entity::find().order_by_asc(influencer::Column::Id);
    if let Some(flag) = approved {
      query = query.filter(influencer::Column::IsApproved.eq(flag));
    }

    let paginator = query.paginate(self.db, limit);
    let total = paginator.num_items().await?;
    let influencers = paginator.fetch_page(page).await?;

    let mut rows = Vec::with_capacity(influencers.len());
    for inf in influencers {
      let codes = Self::code_strings(self.db, inf.id).await?;
      let (count, revenue, commission) =
        Self::sale_totals(self.db, codes).await?;
      let paid =
        Self::payout_total(self.db, inf.id, &[PayoutStatus::Completed])
          .await?;

      rows.push(InfluencerSummary {
        influencer_id: inf.id,
        name: inf.name,
        email: inf.email,
        is_approved: inf.is_approved,
        total_sales: count,
        total_revenue: money::from_cents(revenue),
        total_commission: money::from_cents(commission),
        total_paid: money::from_cents(paid),
        balance: money::from_cents(commission - paid),
      });
    }

    Ok((rows, total))
  }

  /// Balance usable from inside a caller's transaction.
  pub(crate) async fn balance_with<C: ConnectionTrait>(
    conn: &C,
    influencer_id: i64,
  ) -> Result<i64> {
    let codes = Self::code_strings(conn, influencer_id).await?;
    let (_, _, commission) = Self::sale_totals(conn, codes).await?;
    let paid =
      Self::payout_total(conn, influencer_id, &[PayoutStatus::Completed])
        .await?;
    Ok(commission - paid)
  }

  /// Balance minus payouts that are pending or processing; those are
  /// provisionally reserved so concurrent payouts cannot jointly exceed
  /// the funds.
  pub(crate) async fn available_with<C: ConnectionTrait>(
    conn: &C,
    influencer_id: i64,
  ) -> Result<i64> {
    let balance = Self::balance_with(conn, influencer_id).await?;
    let reserved = Self::payout_total(
      conn,
      influencer_id,
      &[PayoutStatus::Pending, PayoutStatus::Processing],
    )
    .await?;
    Ok(balance - reserved)
  }

  async fn code_strings<C: ConnectionTrait>(
    conn: &C,
    influencer_id: i64,
  ) -> Result<Vec<String>> {
    Ok(
      discount_code::Entity::find()
        .filter(discount_code::Column::InfluencerId.eq(influencer_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|c| c.code)
        .collect(),
    )
  }

  async fn sale_totals<C: ConnectionTrait>(
    conn: &C,
    codes: Vec<String>,
  ) -> Result<(u64, i64, i64)> {
    if codes.is_empty() {
      return Ok((0, 0, 0));
    }

    type Row = (Option<i64>, Option<i64>, Option<i64>);
    let row: Option<Row> = sale::Entity::find()
      .select_only()
      .column_as(Expr::col(sale::Column::Id).count(), "count")
      .column_as(Expr::col(sale::Column::AmountCents).sum(), "revenue")
      .column_as(Expr::col(sale::Column::CommissionCents).sum(), "commission")
      .filter(sale::Column::Code.is_in(codes))
      .into_tuple()
      .one(conn)
      .await?;

    Ok((
      row.and_then(|r| r.0).unwrap_or(0) as u64,
      row.and_then(|r| r.1).unwrap_or(0),
      row.and_then(|r| r.2).unwrap_or(0),
    ))
  }

  async fn payout_total<C: ConnectionTrait>(
    conn: &C,
    influencer_id: i64,
    statuses: &[PayoutStatus],
  ) -> Result<i64> {
    let total: Option<Option<i64>> = payout::Entity::find()
      .select_only()
      .column_as(Expr::col(payout::Column::AmountCents).sum(), "total")
      .filter(payout::Column::InfluencerId.eq(influencer_id))
      .filter(payout::Column::Status.is_in(statuses.iter().copied()))
      .into_tuple()
      .one(conn)
      .await?;

    Ok(total.flatten().unwrap_or(0))
  }
}
