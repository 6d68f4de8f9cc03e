//! Business logic services.

pub mod batch;
pub mod dashboard;
pub mod inventory;
pub mod parser;
pub mod progress;
pub mod resolver;
pub mod validator;

pub use batch::{BatchOutcome, BatchProcessor, RowError};
pub use progress::{ProgressHub, ProgressReporter, start_progress_pruning};
pub use resolver::{EntityKey, EntityResolver};
