//! CSV lead ingestion

pub mod pipeline;
pub mod summary;

pub use pipeline::{IngestPipeline, notification_message};
pub use summary::{IngestSummary, RowReport, RowStatus};
