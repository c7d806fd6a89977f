//! Row-level KPI columns

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use store_ingest::{Observation, UnifiedDataset};

use crate::percentage;

/// A unified row extended with its conversion and loyalty rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRow {
    pub observation: Observation,
    /// `sales / footfall * 100`
    pub conversion_rate: f64,
    /// `loyalty_signups / footfall * 100`
    pub loyalty_rate: f64,
}

impl KpiRow {
    pub fn from_observation(observation: Observation) -> Self {
        let conversion_rate = percentage(observation.sales, observation.footfall);
        let loyalty_rate = percentage(observation.loyalty_signups, observation.footfall);
        Self {
            observation,
            conversion_rate,
            loyalty_rate,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.observation.date
    }

    pub fn store_id(&self) -> &str {
        &self.observation.store_id
    }
}

impl AsRef<Observation> for KpiRow {
    fn as_ref(&self) -> &Observation {
        &self.observation
    }
}

/// The unified dataset with KPI columns, in the same row order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiDataset {
    rows: Vec<KpiRow>,
}

impl KpiDataset {
    pub fn rows(&self) -> &[KpiRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KpiRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<KpiRow> {
        self.rows
    }

    /// Rows of a single store
    pub fn for_store(&self, store_id: &str) -> KpiDataset {
        self.filtered(|row| row.store_id() == store_id)
    }

    /// Rows dated within `[start, end]`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> KpiDataset {
        self.filtered(|row| row.date() >= start && row.date() <= end)
    }

    fn filtered<F: Fn(&KpiRow) -> bool>(&self, keep: F) -> KpiDataset {
        KpiDataset {
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a KpiDataset {
    type Item = &'a KpiRow;
    type IntoIter = std::slice::Iter<'a, KpiRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Extend every row with `conversion_rate` and `loyalty_rate`.
///
/// Rows are neither dropped nor reordered. A row with zero footfall gets
/// `0.0` for both rates.
pub fn add_kpi_columns(dataset: UnifiedDataset) -> KpiDataset {
    KpiDataset {
        rows: dataset
            .into_rows()
            .into_iter()
            .map(KpiRow::from_observation)
            .collect(),
    }
}
