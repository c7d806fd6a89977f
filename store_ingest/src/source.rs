//! Source loaders for the three raw datasets.
//!
//! Each raw file carries `date`, `store_id` and exactly one metric column. A
//! loader turns it into a [`SourceTable`]: typed dates, sorted by
//! `(date, store_id)`. Loaders do not clean values. Negative counts pass
//! through untouched and empty cells stay absent until the merger zero-fills
//! them.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Cell spellings treated as "no value" in a metric column.
const MISSING_MARKERS: [&str; 4] = ["na", "n/a", "nan", "null"];

/// The metric carried by a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Footfall,
    Sales,
    LoyaltySignups,
}

impl Metric {
    /// All metrics, in merge order
    pub const ALL: [Metric; 3] = [Metric::Footfall, Metric::Sales, Metric::LoyaltySignups];

    /// Name of the metric column in raw and unified files
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Footfall => "footfall",
            Metric::Sales => "sales",
            Metric::LoyaltySignups => "loyalty_signups",
        }
    }

    /// Conventional raw file name for the metric
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Metric::Footfall => "footfall.csv",
            Metric::Sales => "sales.csv",
            Metric::LoyaltySignups => "loyalty.csv",
        }
    }
}

/// One row of a canonical source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub date: NaiveDate,
    pub store_id: String,
    /// `None` when the raw cell was empty
    pub value: Option<i64>,
}

impl SourceRow {
    pub fn new(date: NaiveDate, store_id: impl Into<String>, value: i64) -> Self {
        Self {
            date,
            store_id: store_id.into(),
            value: Some(value),
        }
    }
}

/// A single source normalized to `(date, store_id, metric)`, sorted by key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable {
    metric: Metric,
    rows: Vec<SourceRow>,
}

impl SourceTable {
    /// Build a table from rows in any order. The sort is stable, so rows
    /// sharing a key keep their relative order.
    pub fn new(metric: Metric, mut rows: Vec<SourceRow>) -> Self {
        rows.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.store_id.cmp(&b.store_id))
        });
        Self { metric, rows }
    }

    pub fn empty(metric: Metric) -> Self {
        Self {
            metric,
            rows: Vec::new(),
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load footfall data (`date, store_id, footfall`)
pub fn load_footfall_data<P: AsRef<Path>>(path: P) -> Result<SourceTable> {
    load_source(path, Metric::Footfall)
}

/// Load sales data (`date, store_id, sales`)
pub fn load_sales_data<P: AsRef<Path>>(path: P) -> Result<SourceTable> {
    load_source(path, Metric::Sales)
}

/// Load loyalty sign-up data (`date, store_id, loyalty_signups`)
pub fn load_loyalty_data<P: AsRef<Path>>(path: P) -> Result<SourceTable> {
    load_source(path, Metric::LoyaltySignups)
}

/// Load any of the three sources into its canonical table.
///
/// Fails on the first unparseable date, empty store id, non-numeric metric
/// cell or malformed record; no partial table is returned.
pub fn load_source<P: AsRef<Path>>(path: P, metric: Metric) -> Result<SourceTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    let header_map = build_header_map(&headers);

    let date_idx = require_column(&header_map, path, "date")?;
    let store_idx = require_column(&header_map, path, "store_id")?;
    let value_idx = require_column(&header_map, path, metric.column())?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; lines are 1-based
        let line = idx + 2;
        let record = result.map_err(|source| csv_error(path, source))?;

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| IngestError::InvalidDate {
            path: path.to_path_buf(),
            line,
            value: raw_date.to_string(),
        })?;

        let store_id = record.get(store_idx).unwrap_or_default();
        if store_id.is_empty() {
            return Err(IngestError::MissingField {
                path: path.to_path_buf(),
                line,
                column: "store_id".to_string(),
            });
        }

        let raw_value = record.get(value_idx).unwrap_or_default();
        let value = parse_count(raw_value).map_err(|()| IngestError::InvalidValue {
            path: path.to_path_buf(),
            line,
            column: metric.column().to_string(),
            value: raw_value.to_string(),
        })?;

        rows.push(SourceRow {
            date,
            store_id: store_id.to_string(),
            value,
        });
    }

    debug!(
        path = %path.display(),
        metric = metric.column(),
        rows = rows.len(),
        "Loaded source table"
    );

    Ok(SourceTable::new(metric, rows))
}

/// Parse a calendar date, keeping only the date part of a date-time
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|datetime| datetime.date_naive())
}

/// Parse a count cell. Decimals truncate toward zero like the integer cast
/// applied after merging.
fn parse_count(raw: &str) -> std::result::Result<Option<i64>, ()> {
    if raw.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| raw.eq_ignore_ascii_case(marker))
    {
        return Ok(None);
    }

    if let Ok(value) = raw.parse::<i64>() {
        return Ok(Some(value));
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() < i64::MAX as f64 => {
            Ok(Some(value.trunc() as i64))
        }
        _ => Err(()),
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a BOM
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn require_column(
    header_map: &HashMap<String, usize>,
    path: &Path,
    column: &str,
) -> Result<usize> {
    header_map
        .get(column)
        .copied()
        .ok_or_else(|| IngestError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

fn csv_error(path: &Path, source: csv::Error) -> IngestError {
    IngestError::Csv {
        path: PathBuf::from(path),
        source,
    }
}
