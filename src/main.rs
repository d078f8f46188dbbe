mod entity;
mod error;
mod money;
mod plugins;
mod prelude;
mod state;
mod sv;

use std::env;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "affiliate=debug,tower_http=debug,axum=trace,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_url = env::var("DATABASE_URL")
    .unwrap_or_else(|_| "sqlite:affiliate.db?mode=rwc".into());
  let config = Config::from_env();

  info!("Starting Affiliate Ledger v{}", env!("CARGO_PKG_VERSION"));

  let app_state = Arc::new(
    AppState::new(&db_url, config).await.expect("Failed to initialize state"),
  );

  plugins::App::new().register(plugins::server::Plugin).run(app_state).await;

  tokio::signal::ctrl_c().await.expect("Failed to listen for shutdown");
  info!("Shutting down");
}
