use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Influencers::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Influencers::Id)
              .big_integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Influencers::Name).string().not_null())
          .col(
            ColumnDef::new(Influencers::Email)
              .string()
              .not_null()
              .unique_key(),
          )
          .col(
            ColumnDef::new(Influencers::IsApproved)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Influencers::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Influencers::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Influencers {
  Table,
  Id,
  Name,
  Email,
  IsApproved,
  CreatedAt,
}
