//! Part entity. One row per installed part record; not deduplicated.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "parts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub machine_id: Uuid,
    pub oem_id: Uuid,
    pub part_no: String,
    pub part_detail: String,
    pub installed_quantity: i32,
    pub available_quantity: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::machine::Entity",
        from = "Column::MachineId",
        to = "super::machine::Column::Id"
    )]
    Machine,
    #[sea_orm(
        belongs_to = "super::oem::Entity",
        from = "Column::OemId",
        to = "super::oem::Column::Id"
    )]
    Oem,
}

impl Related<super::machine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Machine.def()
    }
}

impl Related<super::oem::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Oem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
