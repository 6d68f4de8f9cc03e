//! Database queries for areas.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::area::{self, ActiveModel, Entity as Area};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Find an area by its normalized name.
    pub async fn find_area_by_name(&self, name: &str) -> AppResult<Option<area::Model>> {
        Area::find()
            .filter(area::Column::Name.eq(name))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find area: {}", e)))
    }

    /// Insert an area. Fails if the name is already taken.
    pub async fn insert_area(&self, name: &str) -> AppResult<area::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert area: {}", e)))
    }

    /// List all areas ordered by name.
    pub async fn list_areas(&self) -> AppResult<Vec<area::Model>> {
        Area::find()
            .order_by_asc(area::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list areas: {}", e)))
    }
}
