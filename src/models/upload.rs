//! Bulk upload models.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::Part;

/// One untyped data row keyed by header name.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// A row that passed validation. Only the row validator constructs these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    pub area: String,
    pub machine: String,
    pub machine_no: String,
    pub oem: String,
    pub part_no: String,
    pub part_detail: String,
    pub installed_quantity: i32,
    pub available_quantity: i32,
}

/// A failed row as reported back to the uploader.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RowErrorReport {
    /// Spreadsheet row number (first data row is 2)
    pub row: usize,
    pub error: String,
    /// The row exactly as parsed
    #[schema(value_type = Object)]
    pub data: RawRow,
}

/// Totals for a processed upload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub total_rows: usize,
    pub successfully_processed: usize,
    pub failed: usize,
    pub errors: Vec<RowErrorReport>,
}

/// Response body for `POST /upload` (200 or 207).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub upload_id: Uuid,
    pub summary: UploadSummary,
    pub processed_parts: Vec<Part>,
}

/// Query string for `POST /upload`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct UploadQuery {
    /// Client-chosen id to correlate with the progress stream
    pub upload_id: Option<Uuid>,
}

/// Query string for `GET /upload/progress`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ProgressQuery {
    pub upload_id: Uuid,
}
