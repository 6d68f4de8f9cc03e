//! Migration: Create oems table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Oems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Oems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Oems::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Oems::Description).text().null())
                    .col(
                        ColumnDef::new(Oems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Oems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_oems_name")
                    .table(Oems::Table)
                    .col(Oems::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Oems::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Oems {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}
