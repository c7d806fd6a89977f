//! Full outer join of the three source tables on `(date, store_id)`

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::dataset::{Observation, UnifiedDataset};
use crate::source::{Metric, SourceTable};

/// Stand-in for a source with no row at a key
const ABSENT: &[Option<i64>] = &[None];

/// Merge footfall, sales and loyalty tables into the unified dataset.
///
/// A key present in any input appears in the output. Metrics missing for a
/// key, or present as empty cells, become `0`: no data is treated as no
/// activity. Output is ordered by `(date, store_id)`.
///
/// The tables must be passed in footfall, sales, loyalty order; a table
/// carrying a different metric than its argument position is a caller bug.
///
/// Keys are not deduplicated. A key repeated within one source fans out like
/// a relational outer join, one output row per combination of that key's
/// footfall, sales and loyalty rows.
pub fn combine(
    footfall: &SourceTable,
    sales: &SourceTable,
    loyalty: &SourceTable,
) -> UnifiedDataset {
    let mut groups: BTreeMap<(NaiveDate, &str), [Vec<Option<i64>>; 3]> = BTreeMap::new();

    for (slot, table) in [footfall, sales, loyalty].into_iter().enumerate() {
        debug_assert_eq!(
            table.metric(),
            Metric::ALL[slot],
            "source table passed in the wrong position"
        );
        for row in table.rows() {
            groups
                .entry((row.date, row.store_id.as_str()))
                .or_default()[slot]
                .push(row.value);
        }
    }

    let mut rows = Vec::with_capacity(groups.len());
    for ((date, store_id), [footfall_values, sales_values, loyalty_values]) in groups {
        for f in present_or_absent(&footfall_values) {
            for s in present_or_absent(&sales_values) {
                for l in present_or_absent(&loyalty_values) {
                    rows.push(Observation {
                        date,
                        store_id: store_id.to_string(),
                        footfall: f.unwrap_or(0),
                        sales: s.unwrap_or(0),
                        loyalty_signups: l.unwrap_or(0),
                    });
                }
            }
        }
    }

    debug!(
        footfall_rows = footfall.len(),
        sales_rows = sales.len(),
        loyalty_rows = loyalty.len(),
        merged_rows = rows.len(),
        "Merged source tables"
    );

    UnifiedDataset::from_sorted(rows)
}

fn present_or_absent(values: &[Option<i64>]) -> &[Option<i64>] {
    if values.is_empty() {
        ABSENT
    } else {
        values
    }
}
