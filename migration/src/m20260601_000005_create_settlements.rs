use sea_orm_migration::prelude::*;

use super::{
  m20260601_000001_create_influencers::Influencers,
  m20260601_000004_create_payouts::Payouts,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Settlements::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Settlements::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(Settlements::PayoutId)
              .integer()
              .not_null()
              .unique_key(),
          )
          .col(
            ColumnDef::new(Settlements::InfluencerId)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(Settlements::AmountCents).big_integer().not_null(),
          )
          .col(
            ColumnDef::new(Settlements::BalanceBeforeCents)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(Settlements::BalanceAfterCents)
              .big_integer()
              .not_null(),
          )
          .col(ColumnDef::new(Settlements::SettledAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_settlements_payout")
              .from(Settlements::Table, Settlements::PayoutId)
              .to(Payouts::Table, Payouts::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_settlements_influencer")
              .from(Settlements::Table, Settlements::InfluencerId)
              .to(Influencers::Table, Influencers::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_settlements_influencer")
          .table(Settlements::Table)
          .col(Settlements::InfluencerId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Settlements::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Settlements {
  Table,
  Id,
  PayoutId,
  InfluencerId,
  AmountCents,
  BalanceBeforeCents,
  BalanceAfterCents,
  SettledAt,
}
