//! Upload progress events delivered over Server-Sent Events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Started,
    Processing,
    Completed,
    Error,
}

impl ProgressStatus {
    /// True for the states after which no more events follow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// Snapshot of an upload's progress. Counters are cumulative.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub upload_id: Uuid,
    pub status: ProgressStatus,
    pub processed_rows: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_rows: usize,
    pub current_batch: usize,
    pub total_batches: usize,
    /// 0-100
    pub percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time_remaining_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    /// Event with zeroed counters.
    pub fn new(
        upload_id: Uuid,
        status: ProgressStatus,
        total_rows: usize,
        total_batches: usize,
    ) -> Self {
        Self {
            upload_id,
            status,
            processed_rows: 0,
            successful: 0,
            failed: 0,
            total_rows,
            current_batch: 0,
            total_batches,
            percentage: 0,
            estimated_time_remaining_ms: None,
            message: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the processed/successful/failed counters and derive the percentage.
    pub fn with_counts(mut self, processed_rows: usize, successful: usize, failed: usize) -> Self {
        self.processed_rows = processed_rows;
        self.successful = successful;
        self.failed = failed;
        self.percentage = percentage(processed_rows, self.total_rows);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Whole-number percentage; an empty upload counts as done.
pub fn percentage(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((processed.min(total) * 100) / total) as u8
}
