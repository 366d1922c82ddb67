//! Fixed-width histogram bucketing.

use std::collections::BTreeMap;

use crate::domain::{Bucket, BucketWidth};

/// Widest span (in buckets) that gets interior empty buckets filled in.
/// Beyond it only occupied buckets are returned.
pub const MAX_FILLED_BUCKETS: i64 = 1_000;

/// Largest bucket index magnitude accepted; farther values are dropped.
const MAX_INDEX: f64 = (1u64 << 52) as f64;

/// Median using the sorted-midpoint rule; `None` for an empty input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Bucket plain values by `floor(value / width)`.
pub fn bucketize(values: impl IntoIterator<Item = f64>, width: BucketWidth) -> Vec<Bucket> {
    bucketize_with(values.into_iter().map(|v| (v, None)), width)
}

/// Bucket `(value, secondary)` pairs; each bucket also carries the median of
/// its finite secondary values.
///
/// Non-finite primary values, and values whose bucket index is out of range,
/// are skipped. The result is sorted by lower bound. When the occupied span is
/// at most [`MAX_FILLED_BUCKETS`] wide it covers every index in between, so
/// ranges are contiguous (interior empty buckets have `count == 0`); a wider
/// span keeps only occupied buckets.
pub fn bucketize_with(
    pairs: impl IntoIterator<Item = (f64, Option<f64>)>,
    width: BucketWidth,
) -> Vec<Bucket> {
    let w = width.get();
    let mut members: BTreeMap<i64, (usize, Vec<f64>)> = BTreeMap::new();

    for (value, secondary) in pairs {
        if !value.is_finite() {
            continue;
        }
        let idx = (value / w).floor();
        if !idx.is_finite() || idx.abs() > MAX_INDEX {
            continue;
        }
        let idx = idx as i64;
        let entry = members.entry(idx).or_default();
        entry.0 += 1;
        if let Some(s) = secondary.filter(|s| s.is_finite()) {
            entry.1.push(s);
        }
    }

    let (Some(&first), Some(&last)) = (members.keys().next(), members.keys().next_back()) else {
        return Vec::new();
    };

    let bucket = |idx: i64| {
        let lower = idx as f64 * w;
        let (count, median) = match members.get(&idx) {
            Some((count, secondary)) => (*count, median(secondary)),
            None => (0, None),
        };
        Bucket {
            lower,
            upper: lower + w,
            count,
            median,
        }
    };

    if last - first < MAX_FILLED_BUCKETS {
        (first..=last).map(bucket).collect()
    } else {
        members.keys().map(|idx| bucket(*idx)).collect()
    }
}

/// Short range label such as `10–20d`.
pub fn bucket_label(bucket: &Bucket, unit: &str) -> String {
    format!("{}–{}{unit}", fmt_bound(bucket.lower), fmt_bound(bucket.upper))
}

fn fmt_bound(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
