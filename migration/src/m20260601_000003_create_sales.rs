use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Sales::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Sales::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          // sales join codes by string value, not by id
          .col(ColumnDef::new(Sales::Code).string().not_null())
          .col(ColumnDef::new(Sales::AmountCents).big_integer().not_null())
          .col(
            ColumnDef::new(Sales::CommissionCents).big_integer().not_null(),
          )
          .col(ColumnDef::new(Sales::RecordedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_sales_code")
          .table(Sales::Table)
          .col(Sales::Code)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Sales::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Sales {
  Table,
  Id,
  Code,
  AmountCents,
  CommissionCents,
  RecordedAt,
}
