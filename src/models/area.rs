//! Area model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::area;

/// A plant area that machines and users belong to.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: Uuid,
    /// Normalized (trimmed, uppercase) name
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<area::Model> for Area {
    fn from(m: area::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for `POST /areas`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAreaRequest {
    pub name: String,
}
