//! Dashboard aggregation models.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Number of distinct machines with parts, per area.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AreaMachineCount {
    pub area_id: Uuid,
    pub area_name: String,
    pub total_machines: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachinePartEntry {
    pub part_no: String,
    pub part_detail: String,
    pub installed_quantity: i32,
    pub available_quantity: i32,
}

/// Parts grouped by machine name.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineParts {
    pub machine_name: String,
    pub parts: Vec<MachinePartEntry>,
}

/// Quantities summed per part number.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartQuantity {
    pub part_no: String,
    pub total_installed: i64,
    pub total_available: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OemQuantity {
    pub name: String,
    pub total_installed_quantity: i64,
}

/// Installed quantity per OEM within one area.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AreaOems {
    pub area_id: Uuid,
    pub area_name: String,
    pub oems: Vec<OemQuantity>,
}

/// Response body for `GET /dashboard`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub area_wise_machines: Vec<AreaMachineCount>,
    pub machine_wise_parts: Vec<MachineParts>,
    pub part_wise_quantities: Vec<PartQuantity>,
    #[serde(rename = "areaWiseOEMs")]
    pub area_wise_oems: Vec<AreaOems>,
}
