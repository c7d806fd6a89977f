//! Ingestion configuration: where raw files live and where output goes

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::source::Metric;

/// Environment variable overriding [`IngestionConfig::raw_dir`]
pub const RAW_DIR_VAR: &str = "STORE_INSIGHTS_RAW_DIR";
/// Environment variable overriding [`IngestionConfig::output_dir`]
pub const OUTPUT_DIR_VAR: &str = "STORE_INSIGHTS_OUTPUT_DIR";

/// File layout of one ingestion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    pub raw_dir: PathBuf,
    pub output_dir: PathBuf,
    pub footfall_file: String,
    pub sales_file: String,
    pub loyalty_file: String,
    pub output_file: String,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            output_dir: PathBuf::from("data/processed"),
            footfall_file: Metric::Footfall.default_file_name().to_string(),
            sales_file: Metric::Sales.default_file_name().to_string(),
            loyalty_file: Metric::LoyaltySignups.default_file_name().to_string(),
            output_file: "combined_data.csv".to_string(),
        }
    }
}

impl IngestionConfig {
    /// Default file names under the given directories
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(raw_dir: P, output_dir: Q) -> Self {
        Self {
            raw_dir: raw_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Defaults, overridden by the process environment (and a `.env` file
    /// in the working directory, when present)
    pub fn from_env() -> Self {
        // A missing .env file is the normal case
        let _ = dotenvy::dotenv();
        Self::default().overridden_by(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden by the process environment and then by the
    /// entries of the env file at `path`. Unlike [`IngestionConfig::from_env`]
    /// the file is only read, never exported into the process environment.
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let entries = dotenvy::from_path_iter(path.as_ref())?
            .collect::<std::result::Result<HashMap<String, String>, _>>()?;
        Ok(Self::default()
            .overridden_by(|key| std::env::var(key).ok().or_else(|| entries.get(key).cloned())))
    }

    /// Apply [`RAW_DIR_VAR`] and [`OUTPUT_DIR_VAR`] from `lookup`. Empty
    /// values are ignored.
    pub fn overridden_by<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(RAW_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            self.raw_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        self
    }

    /// Path of the raw file for `metric`
    pub fn source_path(&self, metric: Metric) -> PathBuf {
        let name = match metric {
            Metric::Footfall => &self.footfall_file,
            Metric::Sales => &self.sales_file,
            Metric::LoyaltySignups => &self.loyalty_file,
        };
        self.raw_dir.join(name)
    }

    /// Path of the persisted unified file
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}
