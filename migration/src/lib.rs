pub use sea_orm_migration::prelude::*;

mod m20260601_000001_create_influencers;
mod m20260601_000002_create_discount_codes;
mod m20260601_000003_create_sales;
mod m20260601_000004_create_payouts;
mod m20260601_000005_create_settlements;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260601_000001_create_influencers::Migration),
      Box::new(m20260601_000002_create_discount_codes::Migration),
      Box::new(m20260601_000003_create_sales::Migration),
      Box::new(m20260601_000004_create_payouts::Migration),
      Box::new(m20260601_000005_create_settlements::Migration),
    ]
  }
}
