use approx::assert_relative_eq;
use chrono::NaiveDate;
use rstest::rstest;
use store_ingest::{combine, Metric, Observation, SourceRow, SourceTable, UnifiedDataset};
use store_kpi::{add_kpi_columns, get_summary_kpis, summarize, SummaryKpis};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn two_store_dataset() -> UnifiedDataset {
    UnifiedDataset::from_rows(vec![
        Observation::new(ymd(2024, 1, 1), "S1", 100, 10, 5),
        Observation::new(ymd(2024, 1, 1), "S2", 0, 3, 1),
        Observation::new(ymd(2024, 1, 2), "S1", 300, 15, 3),
        Observation::new(ymd(2024, 1, 2), "S2", 50, 25, 0),
    ])
}

#[test]
fn test_merge_then_kpi_scenario() {
    let footfall = SourceTable::new(
        Metric::Footfall,
        vec![
            SourceRow::new(ymd(2024, 1, 1), "S1", 100),
            SourceRow::new(ymd(2024, 1, 2), "S1", 50),
        ],
    );
    let sales = SourceTable::new(Metric::Sales, vec![SourceRow::new(ymd(2024, 1, 1), "S1", 10)]);
    let loyalty = SourceTable::empty(Metric::LoyaltySignups);

    let kpis = add_kpi_columns(combine(&footfall, &sales, &loyalty));
    assert_eq!(kpis.len(), 2);

    let first = &kpis.rows()[0];
    assert_eq!(first.date(), ymd(2024, 1, 1));
    assert_relative_eq!(first.conversion_rate, 10.0);
    assert_eq!(first.loyalty_rate, 0.0);

    let second = &kpis.rows()[1];
    assert_eq!(second.observation, Observation::new(ymd(2024, 1, 2), "S1", 50, 0, 0));
    assert_eq!(second.conversion_rate, 0.0);
    assert_eq!(second.loyalty_rate, 0.0);
}

#[test]
fn test_zero_footfall_rows_have_zero_rates() {
    let kpis = add_kpi_columns(two_store_dataset());
    for row in kpis.iter() {
        assert!(row.conversion_rate.is_finite());
        assert!(row.loyalty_rate.is_finite());
        if row.observation.footfall == 0 {
            assert_eq!(row.conversion_rate, 0.0);
            assert_eq!(row.loyalty_rate, 0.0);
        }
    }
}

#[test]
fn test_kpi_columns_keep_order_and_count() {
    let dataset = two_store_dataset();
    let kpis = add_kpi_columns(dataset.clone());

    let original: Vec<&Observation> = dataset.iter().collect();
    let extended: Vec<&Observation> = kpis.iter().map(|r| &r.observation).collect();
    assert_eq!(original, extended);
}

#[test]
fn test_summary_uses_summed_totals() {
    let dataset = two_store_dataset();
    let summary = summarize(&dataset);

    assert_eq!(summary.total_footfall, 450);
    assert_eq!(summary.total_sales, 53);
    assert_eq!(summary.total_loyalty_signups, 9);
    assert_relative_eq!(summary.conversion_rate, 53.0 / 450.0 * 100.0);
    assert_relative_eq!(summary.loyalty_rate, 9.0 / 450.0 * 100.0);

    // Mean of row-level conversion rates is a different number
    let kpis = add_kpi_columns(dataset);
    let mean_rate =
        kpis.iter().map(|r| r.conversion_rate).sum::<f64>() / kpis.len() as f64;
    assert!((mean_rate - summary.conversion_rate).abs() > 1.0);
}

#[rstest]
#[case("S1", 400, 25, 6.25, 2.0)]
#[case("S2", 50, 28, 56.0, 2.0)]
fn test_summary_per_store(
    #[case] store: &str,
    #[case] footfall: i64,
    #[case] sales: i64,
    #[case] conversion: f64,
    #[case] loyalty: f64,
) {
    let kpis = add_kpi_columns(two_store_dataset());
    let summary = get_summary_kpis(&kpis.for_store(store));

    assert_eq!(summary.total_footfall, footfall);
    assert_eq!(summary.total_sales, sales);
    assert_relative_eq!(summary.conversion_rate, conversion);
    assert_relative_eq!(summary.loyalty_rate, loyalty);
}

#[test]
fn test_summary_of_zero_footfall_window() {
    let dataset = UnifiedDataset::from_rows(vec![
        Observation::new(ymd(2024, 1, 1), "S1", 0, 4, 2),
        Observation::new(ymd(2024, 1, 2), "S1", 0, 0, 1),
    ]);
    let summary = summarize(dataset.rows());

    assert_eq!(summary.total_sales, 4);
    assert_eq!(summary.conversion_rate, 0.0);
    assert_eq!(summary.loyalty_rate, 0.0);
}

#[test]
fn test_summary_over_date_window() {
    let kpis = add_kpi_columns(two_store_dataset());
    let day_two = kpis.between(ymd(2024, 1, 2), ymd(2024, 1, 2));
    let summary = summarize(&day_two);

    assert_eq!(summary.total_footfall, 350);
    assert_relative_eq!(summary.conversion_rate, 40.0 / 350.0 * 100.0);
}

#[test]
fn test_summary_json() {
    let summary = summarize(&two_store_dataset());
    let json = summary.to_json().unwrap();
    assert!(json.contains("\"total_footfall\":450"));

    let parsed: SummaryKpis = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.total_sales, summary.total_sales);
    assert_relative_eq!(parsed.conversion_rate, summary.conversion_rate);
    assert_relative_eq!(parsed.loyalty_rate, summary.loyalty_rate);
}
