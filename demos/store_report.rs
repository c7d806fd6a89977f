//! Store report
//!
//! Runs ingestion over the directories named by `STORE_INSIGHTS_RAW_DIR` and
//! `STORE_INSIGHTS_OUTPUT_DIR` (environment or `.env`), then prints per-store
//! KPI summaries and a week of forecast footfall. Synthetic raw files are
//! generated first when the raw directory has no footfall file.
//!
//! ```text
//! STORE_INSIGHTS_RAW_DIR=/tmp/store_demo/raw cargo run --example store_report
//! ```

use std::error::Error;

use store_ingest::sample::{generate_raw_data, SampleSpec};
use store_ingest::Metric;
use store_insights::{
    add_kpi_columns, forecast_footfall, get_summary_kpis, init_logging, run_ingestion_with,
    summarize, IngestionConfig,
};

fn main() -> Result<(), Box<dyn Error>> {
    init_logging("info")?;

    let config = IngestionConfig::from_env();

    if !config.source_path(Metric::Footfall).exists() {
        println!("Generating sample data in {}", config.raw_dir.display());
        generate_raw_data(&config.raw_dir, &SampleSpec::default())?;
    }

    let dataset = run_ingestion_with(&config)?;
    println!("Wrote {}", config.output_path().display());
    let kpis = add_kpi_columns(dataset.clone());

    println!("\n=== All stores ===");
    print!("{}", summarize(&dataset));

    for store in dataset.stores() {
        println!("\n=== Store {store} ===");
        print!("{}", get_summary_kpis(&kpis.for_store(&store)));

        let forecast = forecast_footfall(&dataset, Some(&store), 7);
        if !forecast.is_available() {
            println!("  Forecast unavailable");
            continue;
        }
        println!("  7-day footfall forecast:");
        for point in &forecast {
            println!(
                "    {}  {:>7.0}  ({:.0} to {:.0})",
                point.date, point.value, point.lower, point.upper
            );
        }
    }

    Ok(())
}
