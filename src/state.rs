use std::env;

use migration::{Migrator, MigratorTrait};
use sha2::{Digest, Sha256};

use crate::{prelude::*, sv};

pub struct Config {
  pub port: u16,
  pub admin_token_digest: String,
  pub sale_lookup_attempts: u32,
  pub sale_lookup_delay: Duration,
}

impl Config {
  pub fn from_env() -> Self {
    let port =
      env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000);

    let admin_token = env::var("ADMIN_TOKEN").expect("ADMIN_TOKEN not set");

    let sale_lookup_attempts = env::var("SALE_LOOKUP_ATTEMPTS")
      .ok()
      .and_then(|v| v.parse().ok())
      .unwrap_or(sv::sale::LOOKUP_ATTEMPTS);

    let sale_lookup_delay = env::var("SALE_LOOKUP_DELAY")
      .ok()
      .and_then(|v| humantime::parse_duration(&v).ok())
      .unwrap_or(sv::sale::LOOKUP_DELAY);

    Self {
      port,
      admin_token_digest: digest(&admin_token),
      sale_lookup_attempts,
      sale_lookup_delay,
    }
  }
}

/// Only the digest of the admin token is kept in memory.
pub fn digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(db_url: &str, config: Config) -> anyhow::Result<Self> {
    let db = Database::connect(db_url).await?;
    Migrator::up(&db, None).await?;

    Ok(Self { db, config })
  }

  pub fn is_admin(&self, token: &str) -> bool {
    digest(token) == self.config.admin_token_digest
  }
}
