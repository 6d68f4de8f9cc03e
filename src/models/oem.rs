//! OEM (original equipment manufacturer) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::oem;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Oem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<oem::Model> for Oem {
    fn from(m: oem::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for `POST /oems`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOemRequest {
    pub name: String,
    pub description: Option<String>,
}
