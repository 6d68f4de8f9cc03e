//! Database queries for machines.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::machine::{self, ActiveModel, Entity as Machine};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Find a machine by its full natural key.
    pub async fn find_machine(
        &self,
        name: &str,
        machine_no: &str,
        area_id: Uuid,
    ) -> AppResult<Option<machine::Model>> {
        Machine::find()
            .filter(machine::Column::Name.eq(name))
            .filter(machine::Column::MachineNo.eq(machine_no))
            .filter(machine::Column::AreaId.eq(area_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find machine: {}", e)))
    }

    /// Find a machine by its (unique) machine number alone.
    pub async fn find_machine_by_no(&self, machine_no: &str) -> AppResult<Option<machine::Model>> {
        Machine::find()
            .filter(machine::Column::MachineNo.eq(machine_no))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find machine: {}", e)))
    }

    /// Insert a machine. Fails if the machine number is already taken.
    pub async fn insert_machine(
        &self,
        name: &str,
        machine_no: &str,
        area_id: Uuid,
    ) -> AppResult<machine::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            machine_no: Set(machine_no.to_string()),
            area_id: Set(area_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert machine: {}", e)))
    }

    /// List all machines ordered by name, then machine number.
    pub async fn list_machines(&self) -> AppResult<Vec<machine::Model>> {
        Machine::find()
            .order_by_asc(machine::Column::Name)
            .order_by_asc(machine::Column::MachineNo)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list machines: {}", e)))
    }
}
