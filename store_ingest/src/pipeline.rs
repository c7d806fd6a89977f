//! End-to-end ingestion: load the three sources, merge, persist

use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::config::IngestionConfig;
use crate::dataset::UnifiedDataset;
use crate::error::{IngestError, Result};
use crate::merge::combine;
use crate::source::{load_source, Metric};

/// Ingest `footfall.csv`, `sales.csv` and `loyalty.csv` from `raw_dir` and
/// write `combined_data.csv` into `output_dir`.
pub fn run_ingestion<P: AsRef<Path>, Q: AsRef<Path>>(
    raw_dir: P,
    output_dir: Q,
) -> Result<UnifiedDataset> {
    run_ingestion_with(&IngestionConfig::new(raw_dir, output_dir))
}

/// Ingest using an explicit file layout.
///
/// Every source is parsed before anything is written, and the output file is
/// replaced in a single rename, so a failed run never leaves a truncated
/// unified file behind.
pub fn run_ingestion_with(config: &IngestionConfig) -> Result<UnifiedDataset> {
    let footfall = load_source(config.source_path(Metric::Footfall), Metric::Footfall)?;
    let sales = load_source(config.source_path(Metric::Sales), Metric::Sales)?;
    let loyalty = load_source(
        config.source_path(Metric::LoyaltySignups),
        Metric::LoyaltySignups,
    )?;

    let dataset = combine(&footfall, &sales, &loyalty);

    fs::create_dir_all(&config.output_dir)?;
    let output = config.output_path();
    let staging = output.with_extension("csv.partial");
    let persisted = dataset
        .write_csv(&staging)
        .and_then(|()| fs::rename(&staging, &output).map_err(IngestError::from));
    if let Err(err) = persisted {
        match fs::remove_file(&staging) {
            Err(cleanup) if cleanup.kind() != io::ErrorKind::NotFound => {
                warn!(path = %staging.display(), error = %cleanup, "Failed to remove staging file");
            }
            _ => {}
        }
        return Err(err);
    }

    info!(
        rows = dataset.len(),
        stores = dataset.stores().len(),
        output = %output.display(),
        "Ingestion complete"
    );

    Ok(dataset)
}
