//! # Store Ingest
//!
//! Loading and merging of daily per-store retail metrics.
//!
//! ## Features
//!
//! - Source loaders for the footfall, sales and loyalty sign-up files
//! - Full outer merge on `(date, store_id)` with zero-filled gaps
//! - Persistence of the unified dataset as delimited text
//! - Polars `DataFrame` export for tabular consumers
//! - Seeded synthetic raw data
//!
//! ## Quick Start
//!
//! ```no_run
//! use store_ingest::run_ingestion;
//!
//! let dataset = run_ingestion("data/raw", "data/processed")?;
//! for store in dataset.stores() {
//!     println!("{store}: {} rows", dataset.for_store(&store).len());
//! }
//! # Ok::<(), store_ingest::IngestError>(())
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod sample;
pub mod source;

// Re-export commonly used types
pub use crate::config::IngestionConfig;
pub use crate::dataset::{Observation, UnifiedDataset};
pub use crate::error::IngestError;
pub use crate::merge::combine;
pub use crate::pipeline::{run_ingestion, run_ingestion_with};
pub use crate::source::{
    load_footfall_data, load_loyalty_data, load_sales_data, load_source, Metric, SourceRow,
    SourceTable,
};
