//! The unified `(date, store_id)` dataset shared by KPI and forecast code

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// One merged row. Metrics absent from a source are recorded as zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub store_id: String,
    pub footfall: i64,
    pub sales: i64,
    pub loyalty_signups: i64,
}

impl Observation {
    pub fn new(
        date: NaiveDate,
        store_id: impl Into<String>,
        footfall: i64,
        sales: i64,
        loyalty_signups: i64,
    ) -> Self {
        Self {
            date,
            store_id: store_id.into(),
            footfall,
            sales,
            loyalty_signups,
        }
    }
}

impl AsRef<Observation> for Observation {
    fn as_ref(&self) -> &Observation {
        self
    }
}

/// Merged footfall, sales and loyalty data, sorted by `(date, store_id)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedDataset {
    rows: Vec<Observation>,
}

impl UnifiedDataset {
    /// Column order of the persisted file
    pub const COLUMNS: [&'static str; 5] =
        ["date", "store_id", "footfall", "sales", "loyalty_signups"];

    /// Build a dataset from rows in any order (stable sort by key)
    pub fn from_rows(mut rows: Vec<Observation>) -> Self {
        rows.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.store_id.cmp(&b.store_id))
        });
        Self { rows }
    }

    /// Wrap rows the caller has already ordered by key
    pub(crate) fn from_sorted(rows: Vec<Observation>) -> Self {
        debug_assert!(rows
            .windows(2)
            .all(|w| (w[0].date, &w[0].store_id) <= (w[1].date, &w[1].store_id)));
        Self { rows }
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Observation> {
        self.rows
    }

    /// Distinct store ids in ascending order
    pub fn stores(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.store_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Earliest and latest date present, if any
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.first()?.date;
        let last = self.rows.last()?.date;
        Some((first, last))
    }

    /// Rows of a single store
    pub fn for_store(&self, store_id: &str) -> UnifiedDataset {
        self.filtered(|row| row.store_id == store_id)
    }

    /// Rows dated within `[start, end]`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> UnifiedDataset {
        self.filtered(|row| row.date >= start && row.date <= end)
    }

    fn filtered<F: Fn(&Observation) -> bool>(&self, keep: F) -> UnifiedDataset {
        UnifiedDataset {
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }

    /// Persist as delimited text: header line, ISO dates, no index column.
    /// The header is written even when there are no rows.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let to_csv_error = |source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer.write_record(Self::COLUMNS).map_err(to_csv_error)?;
        for row in &self.rows {
            writer.serialize(row).map_err(to_csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Reload a file produced by [`UnifiedDataset::write_csv`]
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);

        let rows = reader
            .deserialize::<Observation>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|source| IngestError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::from_rows(rows))
    }

    /// Columnar view with `date` typed as a polars `Date`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        // 1970-01-01, the origin of polars' day-count Date encoding
        let epoch = NaiveDate::default();

        let days: Vec<i32> = self
            .rows
            .iter()
            .map(|row| (row.date - epoch).num_days() as i32)
            .collect();
        let stores: Vec<&str> = self.rows.iter().map(|row| row.store_id.as_str()).collect();
        let footfall: Vec<i64> = self.rows.iter().map(|row| row.footfall).collect();
        let sales: Vec<i64> = self.rows.iter().map(|row| row.sales).collect();
        let loyalty: Vec<i64> = self.rows.iter().map(|row| row.loyalty_signups).collect();

        let date_series = Series::new("date", days).cast(&DataType::Date)?;
        let df = DataFrame::new(vec![
            date_series,
            Series::new("store_id", stores),
            Series::new("footfall", footfall),
            Series::new("sales", sales),
            Series::new("loyalty_signups", loyalty),
        ])?;

        Ok(df)
    }
}

impl<'a> IntoIterator for &'a UnifiedDataset {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
