mod handlers;

use std::net::SocketAddr;

use anyhow::Context;
use async_trait::async_trait;
use axum::{
  Json, Router,
  extract::{Request, State},
  http::{StatusCode, header},
  middleware::{self, Next},
  response::{IntoResponse, Response},
  routing::{get, patch, post, put},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{prelude::*, state::AppState};

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(100)
        .finish()
        .context("Failed to build rate limiter config")?,
    );

    let governor_limiter = governor_conf.limiter().clone();

    tokio::spawn(async move {
      loop {
        tokio::time::sleep(Duration::from_secs(60)).await;
        governor_limiter.retain_recent();
      }
    });

    let admin = Router::new()
      .route("/sales", get(handlers::list_sales))
      .route("/sales/stats", get(handlers::sale_stats))
      .route("/codes", post(handlers::create_code).get(handlers::list_codes))
      .route(
        "/codes/{id}",
        put(handlers::update_code).delete(handlers::delete_code),
      )
      .route("/codes/{id}/approve", post(handlers::approve_code))
      .route(
        "/influencers",
        post(handlers::create_influencer).get(handlers::list_influencers),
      )
      .route(
        "/influencers/{id}/approve",
        post(handlers::approve_influencer),
      )
      .route("/balance", get(handlers::global_summary))
      .route("/balance/{influencer_id}", get(handlers::balance_report))
      .route(
        "/payouts",
        post(handlers::create_payout).get(handlers::list_payouts),
      )
      .route("/payouts/{id}", patch(handlers::update_payout))
      .route("/settlements", get(handlers::list_settlements))
      .route(
        "/settlements/{influencer_id}",
        get(handlers::settlement_history),
      )
      .layer(middleware::from_fn_with_state(app.clone(), require_admin));

    let router = Router::new()
      .route("/health", get(handlers::health))
      .route("/sale", post(handlers::record_sale))
      .merge(admin)
      .layer(
        ServiceBuilder::new()
          .layer(TraceLayer::new_for_http())
          .layer(GovernorLayer::new(governor_conf))
          .layer(
            CorsLayer::new()
              .allow_origin(Any)
              .allow_methods(Any)
              .allow_headers(Any),
          ),
      )
      .with_state(app.clone())
      .into_make_service_with_connect_info::<SocketAddr>();

    let addr = SocketAddr::from(([0, 0, 0, 0], app.config.port));

    tracing::info!("HTTP Server listening on {addr}");

    tokio::spawn(async move {
      let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
      axum::serve(listener, router).await.unwrap();
    });

    Ok(())
  }
}

async fn require_admin(
  State(app): State<Arc<AppState>>,
  req: Request,
  next: Next,
) -> Response {
  let authorized = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .is_some_and(|token| app.is_admin(token));

  if authorized {
    next.run(req).await
  } else {
    (
      StatusCode::UNAUTHORIZED,
      Json(handlers::Status { success: false, msg: Some("Unauthorized".into()) }),
    )
      .into_response()
  }
}
