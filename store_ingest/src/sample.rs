//! Synthetic raw data for demos and tests.
//!
//! Writes the three raw files for a handful of stores over consecutive days.
//! Footfall follows a per-store level with a weekly cycle plus Gaussian
//! noise; sales and sign-ups are noisy fractions of footfall. A small share
//! of sales and loyalty rows is dropped so the merger has gaps to fill.
//! Output is fully determined by [`SampleSpec::seed`].

use std::f64::consts::PI;
use std::fs::File;
use std::path::Path;

use chrono::{Days, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::{IngestError, Result};
use crate::source::Metric;

/// Amplitude of the weekly footfall cycle, relative to the store level
const WEEKLY_AMPLITUDE: f64 = 0.15;

/// Parameters of the synthetic raw data
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub stores: Vec<String>,
    pub start: NaiveDate,
    pub days: usize,
    /// Mean daily footfall of the first store; later stores are 25% busier each
    pub base_footfall: f64,
    /// Standard deviation of daily footfall noise
    pub footfall_noise: f64,
    /// Mean share of visitors that buy
    pub conversion: f64,
    /// Mean share of visitors that join the loyalty program
    pub loyalty: f64,
    /// Probability that a sales or loyalty row is left out of its file
    pub gap_probability: f64,
    pub seed: u64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            stores: vec!["S1".to_string(), "S2".to_string(), "S3".to_string()],
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            days: 60,
            base_footfall: 500.0,
            footfall_noise: 40.0,
            conversion: 0.2,
            loyalty: 0.03,
            gap_probability: 0.05,
            seed: 7,
        }
    }
}

impl SampleSpec {
    fn validate(&self) -> Result<()> {
        if self.stores.is_empty() {
            return Err(IngestError::Sample("at least one store is required".to_string()));
        }
        if !(self.base_footfall.is_finite() && self.base_footfall >= 0.0) {
            return Err(IngestError::Sample(
                "base footfall must be finite and non-negative".to_string(),
            ));
        }
        for (name, share) in [
            ("conversion", self.conversion),
            ("loyalty", self.loyalty),
            ("gap probability", self.gap_probability),
        ] {
            if !(0.0..=1.0).contains(&share) {
                return Err(IngestError::Sample(format!(
                    "{name} must be within [0, 1], got {share}"
                )));
            }
        }
        Ok(())
    }
}

/// Write `footfall.csv`, `sales.csv` and `loyalty.csv` into `dir`
pub fn generate_raw_data<P: AsRef<Path>>(dir: P, spec: &SampleSpec) -> Result<()> {
    spec.validate()?;
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let footfall_noise = Normal::new(0.0, spec.footfall_noise)
        .map_err(|e| IngestError::Sample(format!("footfall noise: {e}")))?;
    let share_noise =
        Normal::new(1.0, 0.1).map_err(|e| IngestError::Sample(format!("share noise: {e}")))?;

    let mut writers = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let path = dir.join(metric.default_file_name());
        let file = File::create(&path).map_err(|source| IngestError::Open {
            path: path.clone(),
            source,
        })?;
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(["date", "store_id", metric.column()])
            .map_err(|source| IngestError::Csv {
                path: path.clone(),
                source,
            })?;
        writers.push((path, writer));
    }

    for day in 0..spec.days {
        let date = spec
            .start
            .checked_add_days(Days::new(day as u64))
            .ok_or_else(|| IngestError::Sample("date range overflows the calendar".to_string()))?;
        let weekly = 1.0 + WEEKLY_AMPLITUDE * (2.0 * PI * day as f64 / 7.0).sin();

        for (store_idx, store) in spec.stores.iter().enumerate() {
            let level = spec.base_footfall * (1.0 + 0.25 * store_idx as f64);
            let footfall = (level * weekly + footfall_noise.sample(&mut rng))
                .round()
                .max(0.0);
            let sales = (footfall * spec.conversion * share_noise.sample(&mut rng))
                .round()
                .max(0.0);
            let signups = (footfall * spec.loyalty * share_noise.sample(&mut rng))
                .round()
                .max(0.0);

            let values = [
                Some(footfall),
                Some(sales).filter(|_| !rng.gen_bool(spec.gap_probability)),
                Some(signups).filter(|_| !rng.gen_bool(spec.gap_probability)),
            ];

            for ((path, writer), value) in writers.iter_mut().zip(values) {
                let Some(value) = value else { continue };
                writer
                    .write_record([
                        date.format("%Y-%m-%d").to_string(),
                        store.clone(),
                        format!("{}", value as i64),
                    ])
                    .map_err(|source| IngestError::Csv {
                        path: path.clone(),
                        source,
                    })?;
            }
        }
    }

    for (_, mut writer) in writers {
        writer.flush()?;
    }
    Ok(())
}
