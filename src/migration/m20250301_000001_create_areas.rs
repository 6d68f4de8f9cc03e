//! Migration: Create areas table.
//!
//! Area names are unique so concurrent find-or-create calls converge on one row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Areas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Areas::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Areas::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Areas::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Areas::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_areas_name")
                    .table(Areas::Table)
                    .col(Areas::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Areas::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Areas {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}
