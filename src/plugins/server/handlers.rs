use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
  entity::{PayoutStatus, discount_code, influencer, payout},
  money,
  prelude::*,
  state::AppState,
  sv,
  sv::{
    ledger::{InfluencerSummary, LedgerReport},
    sale::{SaleStats, SaleView},
    settlement::SettlementEntry,
  },
};

#[derive(Serialize)]
pub struct Status {
  pub success: bool,
  pub msg: Option<String>,
}

#[derive(Serialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub page: u64,
  pub limit: u64,
  pub total: u64,
}

fn page_limits(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
  (page.unwrap_or(0), limit.unwrap_or(20).clamp(1, 100))
}

pub async fn health() -> Json<Status> {
  Json(Status { success: true, msg: None })
}

// --- sales ---

#[derive(Deserialize)]
pub struct RecordSaleReq {
  code: String,
  total_amount: Decimal,
}

#[derive(Serialize)]
pub struct RecordedSaleView {
  code: String,
  total_amount: Decimal,
  commission: Decimal,
  recorded_at: DateTime,
  discount_pct: i32,
  commission_pct: i32,
  influencer_name: String,
  influencer_email: String,
}

#[derive(Serialize)]
pub struct SaleCreated {
  sale_id: i32,
  sale: RecordedSaleView,
}

pub async fn record_sale(
  State(app): State<Arc<AppState>>,
  Json(req): Json<RecordSaleReq>,
) -> Result<(StatusCode, Json<SaleCreated>)> {
  let recorded = sv::Sale::with_retry(
    &app.db,
    app.config.sale_lookup_attempts,
    app.config.sale_lookup_delay,
  )
  .record(&req.code, req.total_amount)
  .await?;

  Ok((
    StatusCode::CREATED,
    Json(SaleCreated {
      sale_id: recorded.sale.id,
      sale: RecordedSaleView {
        code: recorded.sale.code,
        total_amount: money::from_cents(recorded.sale.amount_cents),
        commission: money::from_cents(recorded.sale.commission_cents),
        recorded_at: recorded.sale.recorded_at,
        discount_pct: recorded.discount_pct,
        commission_pct: recorded.commission_pct,
        influencer_name: recorded.influencer_name,
        influencer_email: recorded.influencer_email,
      },
    }),
  ))
}

#[derive(Deserialize)]
pub struct SalesQuery {
  code: Option<String>,
  page: Option<u64>,
  limit: Option<u64>,
}

pub async fn list_sales(
  State(app): State<Arc<AppState>>,
  Query(query): Query<SalesQuery>,
) -> Result<Json<Page<SaleView>>> {
  let (page, limit) = page_limits(query.page, query.limit);
  let (sales, total) =
    sv::Sale::new(&app.db).list(query.code.as_deref(), page, limit).await?;

  Ok(Json(Page {
    items: sales.into_iter().map(SaleView::from).collect(),
    page,
    limit,
    total,
  }))
}

pub async fn sale_stats(
  State(app): State<Arc<AppState>>,
) -> Result<Json<SaleStats>> {
  Ok(Json(sv::Sale::new(&app.db).stats().await?))
}

// --- discount codes ---

#[derive(Deserialize)]
pub struct CreateCodeReq {
  influencer_id: i64,
  code: Option<String>,
  discount_percentage: i32,
  commission_pct: i32,
  is_active: Option<bool>,
}

pub async fn create_code(
  State(app): State<Arc<AppState>>,
  Json(req): Json<CreateCodeReq>,
) -> Result<(StatusCode, Json<discount_code::Model>)> {
  let code = sv::Code::new(&app.db)
    .create(
      req.influencer_id,
      req.code.as_deref(),
      req.discount_percentage,
      req.commission_pct,
      req.is_active.unwrap_or(false),
    )
    .await?;

  Ok((StatusCode::CREATED, Json(code)))
}

#[derive(Deserialize)]
pub struct UpdateCodeReq {
  discount_pct: Option<i32>,
  commission_pct: Option<i32>,
  is_active: Option<bool>,
}

pub async fn update_code(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
  Json(req): Json<UpdateCodeReq>,
) -> Result<Json<discount_code::Model>> {
  let code = sv::Code::new(&app.db)
    .update(id, req.discount_pct, req.commission_pct, req.is_active)
    .await?;

  Ok(Json(code))
}

#[derive(Deserialize)]
pub struct ApproveCodeReq {
  discount_pct: i32,
  commission_pct: i32,
}

pub async fn approve_code(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
  Json(req): Json<ApproveCodeReq>,
) -> Result<Json<discount_code::Model>> {
  let code = sv::Code::new(&app.db)
    .approve(id, req.discount_pct, req.commission_pct)
    .await?;

  Ok(Json(code))
}

pub async fn delete_code(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
) -> Result<Json<Status>> {
  sv::Code::new(&app.db).delete(id).await?;
  Ok(Json(Status { success: true, msg: None }))
}

pub async fn list_codes(
  State(app): State<Arc<AppState>>,
) -> Result<Json<Vec<discount_code::Model>>> {
  Ok(Json(sv::Code::new(&app.db).all().await?))
}

// --- influencers ---

#[derive(Deserialize)]
pub struct CreateInfluencerReq {
  name: String,
  email: String,
}

pub async fn create_influencer(
  State(app): State<Arc<AppState>>,
  Json(req): Json<CreateInfluencerReq>,
) -> Result<(StatusCode, Json<influencer::Model>)> {
  let influencer =
    sv::Influencer::new(&app.db).create(&req.name, &req.email).await?;

  Ok((StatusCode::CREATED, Json(influencer)))
}

pub async fn approve_influencer(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<Json<influencer::Model>> {
  Ok(Json(sv::Influencer::new(&app.db).approve(id).await?))
}

pub async fn list_influencers(
  State(app): State<Arc<AppState>>,
) -> Result<Json<Vec<influencer::Model>>> {
  Ok(Json(sv::Influencer::new(&app.db).all().await?))
}

// --- balance ---

pub async fn balance_report(
  State(app): State<Arc<AppState>>,
  Path(influencer_id): Path<i64>,
) -> Result<Json<LedgerReport>> {
  Ok(Json(sv::Ledger::new(&app.db).report(influencer_id).await?))
}

#[derive(Deserialize)]
pub struct SummaryQuery {
  approved: Option<bool>,
  page: Option<u64>,
  limit: Option<u64>,
}

pub async fn global_summary(
  State(app): State<Arc<AppState>>,
  Query(query): Query<SummaryQuery>,
) -> Result<Json<Page<InfluencerSummary>>> {
  let (page, limit) = page_limits(query.page, query.limit);
  let (items, total) = sv::Ledger::new(&app.db)
    .global_summary(query.approved, page, limit)
    .await?;

  Ok(Json(Page { items, page, limit, total }))
}

// --- payouts ---

#[derive(Deserialize)]
pub struct CreatePayoutReq {
  #[serde(rename = "influencerId")]
  influencer_id: i64,
  amount: Decimal,
  iban: String,
  note: Option<String>,
  status: Option<String>,
}

#[derive(Serialize)]
pub struct PayoutView {
  pub id: i32,
  pub influencer_id: i64,
  pub amount: Decimal,
  pub iban: String,
  pub status: PayoutStatus,
  pub note: Option<String>,
  pub created_at: DateTime,
  pub updated_at: DateTime,
  pub completed_at: Option<DateTime>,
}

impl From<payout::Model> for PayoutView {
  fn from(payout: payout::Model) -> Self {
    Self {
      id: payout.id,
      influencer_id: payout.influencer_id,
      amount: money::from_cents(payout.amount_cents),
      iban: payout.iban,
      status: payout.status,
      note: payout.note,
      created_at: payout.created_at,
      updated_at: payout.updated_at,
      completed_at: payout.completed_at,
    }
  }
}

fn parse_status(status: Option<&str>) -> Result<Option<PayoutStatus>> {
  status
    .map(|s| {
      PayoutStatus::parse(s).ok_or_else(|| Error::InvalidStatus(s.to_string()))
    })
    .transpose()
}

pub async fn create_payout(
  State(app): State<Arc<AppState>>,
  Json(req): Json<CreatePayoutReq>,
) -> Result<(StatusCode, Json<PayoutView>)> {
  let status = parse_status(req.status.as_deref())?;

  let payout = sv::Payout::new(&app.db)
    .create(req.influencer_id, req.amount, &req.iban, req.note, status)
    .await?;

  Ok((StatusCode::CREATED, Json(payout.into())))
}

#[derive(Deserialize)]
pub struct UpdatePayoutReq {
  status: String,
}

pub async fn update_payout(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
  Json(req): Json<UpdatePayoutReq>,
) -> Result<Json<PayoutView>> {
  let payout = sv::Payout::new(&app.db).set_status(id, &req.status).await?;
  Ok(Json(payout.into()))
}

#[derive(Deserialize)]
pub struct PayoutsQuery {
  status: Option<String>,
  page: Option<u64>,
  limit: Option<u64>,
}

pub async fn list_payouts(
  State(app): State<Arc<AppState>>,
  Query(query): Query<PayoutsQuery>,
) -> Result<Json<Page<PayoutView>>> {
  let status = parse_status(query.status.as_deref())?;
  let (page, limit) = page_limits(query.page, query.limit);

  let (payouts, total) =
    sv::Payout::new(&app.db).list(status, page, limit).await?;

  Ok(Json(Page {
    items: payouts.into_iter().map(PayoutView::from).collect(),
    page,
    limit,
    total,
  }))
}

// --- settlements ---

pub async fn settlement_history(
  State(app): State<Arc<AppState>>,
  Path(influencer_id): Path<i64>,
) -> Result<Json<Vec<SettlementEntry>>> {
  Ok(Json(sv::Settlement::new(&app.db).history(influencer_id).await?))
}

pub async fn list_settlements(
  State(app): State<Arc<AppState>>,
) -> Result<Json<Vec<SettlementEntry>>> {
  Ok(Json(sv::Settlement::new(&app.db).all().await?))
}
