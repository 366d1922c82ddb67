//! Per-view series shapers.
//!
//! Each function takes raw records (possibly empty, never absent) and returns
//! rows whose numeric fields are finite or `None`.

use crate::data::{Record, field_f64, field_str, first_f64};
use crate::domain::{
    AllocationRow, Bucket, BucketWidth, DistributionBin, DrawdownRow, EquityRow, MaxDrawdown,
};
use crate::shape::bucket::{bucketize, bucketize_with};
use crate::shape::merge::merge_by_key;

const RECOVERY_FIELDS: [&str; 2] = ["recovery_days", "return_days"];
const DEPTH_FIELDS: [&str; 2] = ["drawdown", "depth"];

fn date_of(record: &Record) -> Option<String> {
    field_str(record, "date")
}

/// Strategy equity index with the benchmark's `equity_index` matched by date.
pub fn equity_rows(primary: &[Record], benchmark: &[Record]) -> Vec<EquityRow> {
    let bench = merge_by_key(primary, benchmark, date_of, date_of, |b| {
        field_f64(b, "equity_index")
    });

    primary
        .iter()
        .zip(bench)
        .map(|(r, benchmark)| EquityRow {
            date: date_of(r).unwrap_or_default(),
            equity_index: field_f64(r, "equity_index"),
            benchmark,
        })
        .collect()
}

/// Portfolio drawdown with the benchmark drawdown matched by date.
pub fn drawdown_rows(primary: &[Record], benchmark: &[Record]) -> Vec<DrawdownRow> {
    let bench = merge_by_key(primary, benchmark, date_of, date_of, |b| field_f64(b, "drawdown"));

    primary
        .iter()
        .zip(bench)
        .map(|(r, benchmark)| DrawdownRow {
            date: date_of(r).unwrap_or_default(),
            drawdown: field_f64(r, "drawdown"),
            benchmark,
        })
        .collect()
}

/// Deepest (most negative) finite drawdown; the first one wins ties.
pub fn max_drawdown(rows: &[DrawdownRow]) -> Option<MaxDrawdown> {
    let mut best: Option<MaxDrawdown> = None;
    for (index, row) in rows.iter().enumerate() {
        let Some(dd) = row.drawdown else { continue };
        if best.as_ref().is_none_or(|b| dd < b.drawdown) {
            best = Some(MaxDrawdown {
                index,
                date: row.date.clone(),
                drawdown: dd,
            });
        }
    }
    best
}

/// Two-sleeve allocation expressed as shares of the row total.
pub fn allocation_rows(records: &[Record]) -> Vec<AllocationRow> {
    records
        .iter()
        .filter_map(|r| {
            let aggressive = field_f64(r, "aggressive_pct")?;
            let reserve = field_f64(r, "reserve_pct")?;
            let total = aggressive + reserve;
            if !(total.is_finite() && total > 0.0) {
                return None;
            }
            Some(AllocationRow {
                date: date_of(r).unwrap_or_default(),
                aggressive: aggressive / total,
                reserve: reserve / total,
            })
        })
        .collect()
}

/// Precomputed trade-return bins with their centers and labels.
pub fn distribution_bins(records: &[Record]) -> Vec<DistributionBin> {
    records
        .iter()
        .filter_map(|r| {
            let left = field_f64(r, "bin_left")?;
            let right = field_f64(r, "bin_right")?;
            let count = field_f64(r, "count")?;
            Some(DistributionBin {
                left,
                right,
                center: (left + right) / 2.0,
                count,
                label: format!("{:.2} to {:.2}", unsigned_zero(left), unsigned_zero(right)),
            })
        })
        .collect()
}

/// `-0.0` prints as `-0.00`; labels want `0.00`.
fn unsigned_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

/// Histogram of non-negative recovery times.
pub fn recovery_histogram(records: &[Record], width: BucketWidth) -> Vec<Bucket> {
    let days = records
        .iter()
        .filter_map(|r| first_f64(r, &RECOVERY_FIELDS))
        .filter(|d| *d >= 0.0);
    bucketize(days, width)
}

/// Drawdown depth (percent, positive) buckets with the median recovery time.
pub fn depth_buckets(records: &[Record], width: BucketWidth) -> Vec<Bucket> {
    let pairs = records.iter().filter_map(|r| {
        let depth = first_f64(r, &DEPTH_FIELDS)?.abs() * 100.0;
        let recovery = first_f64(r, &RECOVERY_FIELDS).filter(|d| *d >= 0.0);
        Some((depth, recovery))
    });
    bucketize_with(pairs, width)
}
