//! Batch processing of uploaded rows.
//!
//! Rows are split into fixed-size chunks. Rows within a chunk run
//! concurrently, chunks run one after another, and a failing row never stops
//! the others.

use std::time::Instant;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::db::DbPool;
use crate::entity::part;
use crate::error::AppError;
use crate::models::{RawRow, RowErrorReport, UploadSummary};
use crate::services::inventory::record_part;
use crate::services::progress::{BatchTick, ProgressReporter};
use crate::services::resolver::EntityResolver;
use crate::services::validator::{ValidationError, validate_row};

/// Rows above the first data row: the header.
const HEADER_ROWS: usize = 1;

/// Why a single row was not imported.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] AppError),
}

impl RowError {
    /// Text shown to the uploader. Internal database details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            RowError::Validation(e) => e.message.clone(),
            RowError::Resolution(AppError::Database(_)) => {
                "Failed to save row to the database".to_string()
            }
            RowError::Resolution(e) => e.to_string(),
        }
    }
}

/// Result of processing every row of an upload.
#[derive(Debug)]
pub struct BatchOutcome {
    pub summary: UploadSummary,
    /// Created parts in input order
    pub parts: Vec<part::Model>,
}

impl BatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.summary.failed == 0
    }
}

#[derive(Clone)]
pub struct BatchProcessor {
    pool: DbPool,
    resolver: EntityResolver,
    batch_size: usize,
}

impl BatchProcessor {
    /// A zero batch size is treated as one.
    pub fn new(pool: DbPool, resolver: EntityResolver, batch_size: usize) -> Self {
        Self {
            pool,
            resolver,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Process all rows. Never fails as a whole; per-row failures are
    /// collected in the summary in input order.
    pub async fn process(
        &self,
        rows: &[RawRow],
        reporter: Option<&ProgressReporter>,
    ) -> BatchOutcome {
        let total_rows = rows.len();
        let total_batches = total_rows.div_ceil(self.batch_size);

        if let Some(reporter) = reporter {
            reporter.started(total_rows, total_batches);
        }

        let mut parts = Vec::with_capacity(total_rows);
        let mut errors = Vec::new();
        let mut processed_rows = 0;

        for (batch_index, chunk) in rows.chunks(self.batch_size).enumerate() {
            let started = Instant::now();
            let results = join_all(chunk.iter().map(|row| self.process_row(row))).await;

            for (offset, (raw, result)) in chunk.iter().zip(results).enumerate() {
                let row_number = batch_index * self.batch_size + offset + 1 + HEADER_ROWS;
                match result {
                    Ok(part) => parts.push(part),
                    Err(e) => {
                        warn!(row = row_number, error = %e, "Upload row rejected");
                        errors.push(RowErrorReport {
                            row: row_number,
                            error: e.client_message(),
                            data: raw.clone(),
                        });
                    }
                }
            }
            processed_rows += chunk.len();

            if let Some(reporter) = reporter {
                reporter.batch_completed(&BatchTick {
                    current_batch: batch_index + 1,
                    total_batches,
                    processed_rows,
                    successful: parts.len(),
                    failed: errors.len(),
                    total_rows,
                    batch_duration: started.elapsed(),
                });
            }
        }

        let summary = UploadSummary {
            total_rows,
            successfully_processed: parts.len(),
            failed: errors.len(),
            errors,
        };

        info!(
            total_rows = summary.total_rows,
            successful = summary.successfully_processed,
            failed = summary.failed,
            batches = total_batches,
            "Upload rows processed"
        );

        if let Some(reporter) = reporter {
            reporter.completed(
                total_rows,
                total_batches,
                summary.successfully_processed,
                summary.failed,
            );
        }

        BatchOutcome { summary, parts }
    }

    async fn process_row(&self, raw: &RawRow) -> Result<part::Model, RowError> {
        let row = validate_row(raw)?;
        Ok(record_part(&self.pool, &self.resolver, &row).await?)
    }
}
