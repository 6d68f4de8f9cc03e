//! Part models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Machine, Oem};
use crate::entity::part;

/// A part as stored, with machine and OEM as ids.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: Uuid,
    pub machine: Uuid,
    pub oem: Uuid,
    pub part_no: String,
    pub part_detail: String,
    pub installed_quantity: i32,
    pub available_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<part::Model> for Part {
    fn from(m: part::Model) -> Self {
        Self {
            id: m.id,
            machine: m.machine_id,
            oem: m.oem_id,
            part_no: m.part_no,
            part_detail: m.part_detail,
            installed_quantity: m.installed_quantity,
            available_quantity: m.available_quantity,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// A part with its machine and OEM populated (returned by `GET /parts`).
///
/// `machine`/`oem` are null only if the referenced row is gone.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartDetail {
    pub id: Uuid,
    pub machine: Option<Machine>,
    pub oem: Option<Oem>,
    pub part_no: String,
    pub part_detail: String,
    pub installed_quantity: i32,
    pub available_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /parts`.
///
/// Uses the same field names as an upload row. The handler runs the body
/// through the row validator, so quantities may also be numeric strings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartRequest {
    pub area: String,
    pub machine: String,
    pub machine_no: String,
    pub oem: String,
    pub part_no: String,
    pub part_detail: String,
    pub installed_quantity: i64,
    pub available_quantity: i64,
}

/// Response body for `POST /parts`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PartCreatedResponse {
    pub message: String,
    pub part: Part,
}
