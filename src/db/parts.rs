//! Database queries for parts.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::part::{self, ActiveModel, Entity as Part};
use crate::error::{AppError, AppResult};

use super::DbPool;

/// Column values for a new part.
#[derive(Debug, Clone)]
pub struct NewPart<'a> {
    pub machine_id: Uuid,
    pub oem_id: Uuid,
    pub part_no: &'a str,
    pub part_detail: &'a str,
    pub installed_quantity: i32,
    pub available_quantity: i32,
}

impl DbPool {
    /// Insert a part. Parts are never deduplicated.
    pub async fn insert_part(&self, new: NewPart<'_>) -> AppResult<part::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            machine_id: Set(new.machine_id),
            oem_id: Set(new.oem_id),
            part_no: Set(new.part_no.to_string()),
            part_detail: Set(new.part_detail.to_string()),
            installed_quantity: Set(new.installed_quantity),
            available_quantity: Set(new.available_quantity),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert part: {}", e)))
    }

    /// List all parts, newest first.
    pub async fn list_parts(&self) -> AppResult<Vec<part::Model>> {
        Part::find()
            .order_by_desc(part::Column::CreatedAt)
            .order_by_desc(part::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list parts: {}", e)))
    }

    /// Delete a part. Returns false if no part had that id.
    ///
    /// The owning machine and OEM are left untouched.
    pub async fn delete_part(&self, id: Uuid) -> AppResult<bool> {
        let result = Part::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete part: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
