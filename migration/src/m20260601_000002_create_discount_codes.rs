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
          .table(DiscountCodes::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(DiscountCodes::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(DiscountCodes::Code)
              .string()
              .not_null()
              .unique_key(),
          )
          .col(
            ColumnDef::new(DiscountCodes::InfluencerId)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(DiscountCodes::DiscountPct).integer().not_null(),
          )
          .col(
            ColumnDef::new(DiscountCodes::CommissionPct).integer().not_null(),
          )
          .col(
            ColumnDef::new(DiscountCodes::IsActive)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(
            ColumnDef::new(DiscountCodes::CreatedAt).date_time().not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_discount_codes_influencer")
              .from(DiscountCodes::Table, DiscountCodes::InfluencerId)
              .to(Influencers::Table, Influencers::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_discount_codes_influencer")
          .table(DiscountCodes::Table)
          .col(DiscountCodes::InfluencerId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(DiscountCodes::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum DiscountCodes {
  Table,
  Id,
  Code,
  InfluencerId,
  DiscountPct,
  CommissionPct,
  IsActive,
  CreatedAt,
}
