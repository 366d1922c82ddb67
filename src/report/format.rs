//! Plain-text tables for shaped views.

use chrono::NaiveDate;

use crate::chart::MONTH_NAMES;
use crate::domain::{
    AllocationRow, Bucket, DistributionBin, DrawdownRow, EquityRow, HeatGrid, MaxDrawdown, RiskReturnPoint,
};
use crate::shape::bucket_label;
use crate::views::AxisFormat;

const MAX_ROWS: usize = 12;

fn pct(v: Option<f64>) -> String {
    v.map(|v| AxisFormat::Percent2.format(v)).unwrap_or_else(|| "n/a".to_string())
}

fn num(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.4}")).unwrap_or_else(|| "n/a".to_string())
}

/// `first → last (N days)`; the day count only when both ends are ISO dates.
pub fn date_span(first: &str, last: &str) -> String {
    let parse = |s: &str| NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok();
    match (parse(first), parse(last)) {
        (Some(a), Some(b)) => format!("{first} → {last} ({} days)", (b - a).num_days()),
        _ => format!("{first} → {last}"),
    }
}

/// Indices of rows to print: head and tail around an ellipsis.
fn sample_rows(n: usize) -> (Vec<usize>, bool) {
    if n <= MAX_ROWS {
        return ((0..n).collect(), false);
    }
    let half = MAX_ROWS / 2;
    ((0..half).chain(n - half..n).collect(), true)
}

fn push_sampled<T>(out: &mut String, rows: &[T], mut line: impl FnMut(&T) -> String) {
    let (idx, elided) = sample_rows(rows.len());
    for (k, i) in idx.iter().enumerate() {
        if elided && k == MAX_ROWS / 2 {
            out.push_str(&format!("  ... {} rows ...\n", rows.len() - MAX_ROWS));
        }
        out.push_str(&line(&rows[*i]));
        out.push('\n');
    }
}

pub fn format_equity(rows: &[EquityRow], show_benchmark: bool) -> String {
    let mut out = String::new();
    if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
        out.push_str(&format!("Span: {}\n", date_span(&first.date, &last.date)));
    }
    out.push_str(&format!("{:<12} {:>12} {:>12}\n", "date", "equity", "benchmark"));
    push_sampled(&mut out, rows, |r| {
        let bench = if show_benchmark { num(r.benchmark) } else { "-".to_string() };
        format!("{:<12} {:>12} {:>12}", r.date, num(r.equity_index), bench)
    });
    out
}

pub fn format_drawdown(rows: &[DrawdownRow], max: Option<&MaxDrawdown>, show_benchmark: bool) -> String {
    let mut out = String::new();
    if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
        out.push_str(&format!("Span: {}\n", date_span(&first.date, &last.date)));
    }
    if let Some(m) = max {
        out.push_str(&format!("Max drawdown: {} on {}\n", pct(Some(m.drawdown)), m.date));
    }
    out.push_str(&format!("{:<12} {:>10} {:>10}\n", "date", "drawdown", "benchmark"));
    push_sampled(&mut out, rows, |r| {
        let bench = if show_benchmark { pct(r.benchmark) } else { "-".to_string() };
        format!("{:<12} {:>10} {:>10}", r.date, pct(r.drawdown), bench)
    });
    out
}

pub fn format_allocation(rows: &[AllocationRow]) -> String {
    let mut out = format!("{:<12} {:>10} {:>10}\n", "date", "main", "reserve");
    push_sampled(&mut out, rows, |r| {
        format!("{:<12} {:>10} {:>10}", r.date, pct(Some(r.aggressive)), pct(Some(r.reserve)))
    });
    out
}

/// Years as rows, months as columns; `compact` transposes.
pub fn format_heat_grid(grid: &HeatGrid, compact: bool) -> String {
    let mut out = String::new();
    let years: Vec<i32> = grid.years.keys().copied().collect();

    if compact {
        out.push_str(&format!("{:<5}", ""));
        for y in &years {
            out.push_str(&format!("{y:>9}"));
        }
        out.push('\n');
        for (m, name) in MONTH_NAMES.iter().enumerate() {
            out.push_str(&format!("{name:<5}"));
            for y in &years {
                out.push_str(&format!("{:>9}", pct(grid.get(*y, m as u32 + 1))));
            }
            out.push('\n');
        }
    } else {
        out.push_str(&format!("{:<6}", "year"));
        for name in MONTH_NAMES {
            out.push_str(&format!("{name:>8}"));
        }
        out.push('\n');
        for y in &years {
            out.push_str(&format!("{y:<6}"));
            for m in 1..=12 {
                out.push_str(&format!("{:>8}", pct(grid.get(*y, m))));
            }
            out.push('\n');
        }
    }
    out
}

pub fn format_distribution(bins: &[DistributionBin]) -> String {
    let mut out = format!("{:<22} {:>8}\n", "bin", "count");
    for b in bins {
        out.push_str(&format!("{:<22} {:>8.0}\n", b.label, b.count));
    }
    out
}

pub fn format_buckets(buckets: &[Bucket], unit: &str) -> String {
    let with_median = buckets.iter().any(|b| b.median.is_some());
    let mut out = if with_median {
        format!("{:<14} {:>6} {:>10}\n", "bucket", "count", "median")
    } else {
        format!("{:<14} {:>6}\n", "bucket", "count")
    };
    for b in buckets {
        let label = bucket_label(b, unit);
        if with_median {
            let median = b.median.map(|m| format!("{m:.1}")).unwrap_or_else(|| "-".to_string());
            out.push_str(&format!("{label:<14} {:>6} {median:>10}\n", b.count));
        } else {
            out.push_str(&format!("{label:<14} {:>6}\n", b.count));
        }
    }
    out
}

pub fn format_risk_return(points: &[RiskReturnPoint]) -> String {
    let mut out = format!("{:>10} {:>10}\n", "drawdown", "return");
    push_sampled(&mut out, points, |p| {
        format!("{:>10} {:>10}", pct(Some(p.drawdown)), pct(Some(p.ret)))
    });
    out
}
