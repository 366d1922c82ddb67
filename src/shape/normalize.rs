//! Returns normalized to the first observation.

use crate::data::{Record, field_f64, first_f64};
use crate::domain::RiskReturnPoint;

const EQUITY_FIELDS: [&str; 2] = ["equity", "account_equity"];

/// `(equity - base) / base` for every equity value, in order.
///
/// Non-finite equities are dropped rather than propagated.
pub fn normalize_returns(base: f64, equities: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let base = usable_base(Some(base));
    equities
        .into_iter()
        .filter(|e| e.is_finite())
        .map(|e| (e - base) / base)
        .collect()
}

/// Drawdown/return scatter from equity-chart records.
///
/// The base is the first record's equity; a missing, zero or non-finite base
/// falls back to 1. Records without a finite equity and drawdown are skipped.
pub fn risk_return_points(records: &[Record]) -> Vec<RiskReturnPoint> {
    let base = usable_base(records.first().and_then(|r| first_f64(r, &EQUITY_FIELDS)));

    records
        .iter()
        .filter_map(|r| {
            let equity = first_f64(r, &EQUITY_FIELDS)?;
            let drawdown = field_f64(r, "drawdown")?;
            Some(RiskReturnPoint {
                drawdown,
                ret: (equity - base) / base,
            })
        })
        .collect()
}

fn usable_base(base: Option<f64>) -> f64 {
    match base {
        Some(b) if b.is_finite() && b != 0.0 => b,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::records;
    use serde_json::json;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn normalizes_against_base() {
        let out = normalize_returns(100.0, [100.0, 110.0, 90.0]);
        assert_eq!(out.len(), 3);
        assert!(close(out[0], 0.0));
        assert!(close(out[1], 0.10));
        assert!(close(out[2], -0.10));
    }

    #[test]
    fn zero_base_falls_back_to_one() {
        let out = normalize_returns(0.0, [2.0]);
        assert!(close(out[0], 1.0));
    }

    #[test]
    fn scatter_skips_records_with_missing_fields() {
        let rows = records(json!([
            {"equity": 200, "drawdown": 0.0},
            {"equity": 220, "drawdown": -0.01},
            {"equity": "oops", "drawdown": -0.02},
            {"equity": 180, "drawdown": null},
            {"account_equity": 190, "drawdown": -0.05}
        ]));
        let points = risk_return_points(&rows);
        assert_eq!(points.len(), 3);
        assert!(close(points[1].ret, 0.10));
        assert!(close(points[2].ret, -0.05));
        assert!(close(points[2].drawdown, -0.05));
    }

    #[test]
    fn scatter_of_empty_input_is_empty() {
        assert!(risk_return_points(&[]).is_empty());
    }
}
