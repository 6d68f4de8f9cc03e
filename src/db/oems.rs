//! Database queries for OEMs.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::oem::{self, ActiveModel, Entity as Oem};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Find an OEM by name.
    pub async fn find_oem_by_name(&self, name: &str) -> AppResult<Option<oem::Model>> {
        Oem::find()
            .filter(oem::Column::Name.eq(name))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find OEM: {}", e)))
    }

    /// Insert an OEM. Fails if the name is already taken.
    pub async fn insert_oem(&self, name: &str, description: Option<&str>) -> AppResult<oem::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            description: Set(description.map(|s| s.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert OEM: {}", e)))
    }

    /// List all OEMs ordered by name.
    pub async fn list_oems(&self) -> AppResult<Vec<oem::Model>> {
        Oem::find()
            .order_by_asc(oem::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list OEMs: {}", e)))
    }
}
