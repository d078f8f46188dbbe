use sea_orm_migration::prelude::*;

use super::m20260601_000001_create_influencers::Influencers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Payouts::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Payouts::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(Payouts::InfluencerId).big_integer().not_null(),
          )
          .col(ColumnDef::new(Payouts::AmountCents).big_integer().not_null())
          .col(ColumnDef::new(Payouts::Iban).string().not_null())
          .col(
            ColumnDef::new(Payouts::Status)
              .string()
              .not_null()
              .default("pending"),
          )
          .col(ColumnDef::new(Payouts::Note).string().null())
          .col(ColumnDef::new(Payouts::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Payouts::UpdatedAt).date_time().not_null())
          .col(ColumnDef::new(Payouts::CompletedAt).date_time().null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_payouts_influencer")
              .from(Payouts::Table, Payouts::InfluencerId)
              .to(Influencers::Table, Influencers::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_payouts_influencer")
          .table(Payouts::Table)
          .col(Payouts::InfluencerId)
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_payouts_status")
          .table(Payouts::Table)
          .col(Payouts::Status)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Payouts::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Payouts {
  Table,
  Id,
  InfluencerId,
  AmountCents,
  Iban,
  Status,
  Note,
  CreatedAt,
  UpdatedAt,
  CompletedAt,
}
