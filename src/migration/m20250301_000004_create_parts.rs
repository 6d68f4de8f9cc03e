//! Migration: Create parts table.
//!
//! `part_no` is indexed but not unique: every upload row inserts a new part.
//! References restrict deletion of machines/OEMs still in use and never cascade.
//! Quantity bounds are enforced by the row validator before insert.

use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_machines::Machines;
use super::m20250301_000003_create_oems::Oems;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Parts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Parts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Parts::MachineId).uuid().not_null())
                    .col(ColumnDef::new(Parts::OemId).uuid().not_null())
                    .col(ColumnDef::new(Parts::PartNo).string_len(255).not_null())
                    .col(ColumnDef::new(Parts::PartDetail).text().not_null())
                    .col(
                        ColumnDef::new(Parts::InstalledQuantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Parts::AvailableQuantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Parts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Parts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parts_machine_id")
                            .from(Parts::Table, Parts::MachineId)
                            .to(Machines::Table, Machines::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parts_oem_id")
                            .from(Parts::Table, Parts::OemId)
                            .to(Oems::Table, Oems::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parts_machine_id")
                    .table(Parts::Table)
                    .col(Parts::MachineId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parts_part_no")
                    .table(Parts::Table)
                    .col(Parts::PartNo)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Parts::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Parts {
    Table,
    Id,
    MachineId,
    OemId,
    PartNo,
    PartDetail,
    InstalledQuantity,
    AvailableQuantity,
    CreatedAt,
    UpdatedAt,
}
