//! Machine model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::machine;

/// A machine installed in an area.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: Uuid,
    pub name: String,
    pub machine_no: String,
    /// Owning area id
    pub area: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<machine::Model> for Machine {
    fn from(m: machine::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            machine_no: m.machine_no,
            area: m.area_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for `POST /machines`. `area` is an area name.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMachineRequest {
    pub name: String,
    pub machine_no: String,
    pub area: String,
}
