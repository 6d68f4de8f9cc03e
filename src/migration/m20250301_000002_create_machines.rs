//! Migration: Create machines table.
//!
//! `machine_no` is unique across all areas.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_areas::Areas;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Machines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Machines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Machines::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Machines::MachineNo).string_len(100).not_null())
                    .col(ColumnDef::new(Machines::AreaId).uuid().not_null())
                    .col(
                        ColumnDef::new(Machines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Machines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_machines_area_id")
                            .from(Machines::Table, Machines::AreaId)
                            .to(Areas::Table, Areas::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_machines_machine_no")
                    .table(Machines::Table)
                    .col(Machines::MachineNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_machines_area_id")
                    .table(Machines::Table)
                    .col(Machines::AreaId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Machines::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Machines {
    Table,
    Id,
    Name,
    MachineNo,
    AreaId,
    CreatedAt,
    UpdatedAt,
}
