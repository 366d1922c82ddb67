//! Shared "load → shape" logic used by both CLI and TUI front-ends.
//!
//! Every view runs through the same path, parameterized by its `ViewSpec`:
//! fetch primary (+ optional benchmark) → records → shaping strategy.
//! The CLI runs it synchronously; the TUI feeds it load states that arrive
//! from background fetches.

use crate::data::{Fetch, LoadState, load};
use crate::domain::{ShapeOptions, Shaped};
use crate::views::{ShapeInput, ViewSpec};

/// Shaped output of one view plus the inline failure messages it carries.
#[derive(Debug, Clone)]
pub struct ViewOutput {
    pub shaped: Shaped,
    /// Primary resource failure (`Data error: …`).
    pub data_error: Option<String>,
    /// Benchmark resource failure (`Benchmark error: …`).
    pub benchmark_error: Option<String>,
    /// Records the primary resource produced.
    pub primary_records: usize,
}

impl ViewOutput {
    /// Inline messages in display order.
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(e) = &self.data_error {
            out.push(format!("Data error: {e}"));
        }
        if let Some(e) = &self.benchmark_error {
            out.push(format!("Benchmark error: {e}"));
        }
        out
    }
}

/// Shape whatever the view's resources currently hold.
///
/// Pending or failed resources contribute no records; shaping always runs.
pub fn shape_states(
    spec: &ViewSpec,
    primary: &LoadState,
    secondary: Option<&LoadState>,
    options: &ShapeOptions,
) -> ViewOutput {
    let secondary_records = secondary.map(LoadState::records).unwrap_or(&[]);
    let input = ShapeInput {
        primary: primary.records(),
        secondary: secondary_records,
    };
    let shaped = spec.shape(input, options);
    tracing::debug!(
        view = spec.kind.path(),
        primary = input.primary.len(),
        secondary = input.secondary.len(),
        shaped = shaped.len(),
        "shaped view"
    );

    ViewOutput {
        shaped,
        data_error: primary.error().map(str::to_string),
        benchmark_error: secondary.and_then(LoadState::error).map(str::to_string),
        primary_records: input.primary.len(),
    }
}

/// Fetch a view's resources in order and shape them.
pub fn load_view(fetcher: &dyn Fetch, spec: &ViewSpec, options: &ShapeOptions) -> ViewOutput {
    let primary = LoadState::from(load(fetcher, spec.primary));
    let secondary = spec.secondary.map(|name| LoadState::from(load(fetcher, name)));
    shape_states(spec, &primary, secondary.as_ref(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stub::StubFetcher;
    use crate::error::LoadError;
    use crate::views::{ViewKind, spec_for};

    #[test]
    fn equity_merges_benchmark_by_date() {
        let fetcher = StubFetcher::new()
            .with(
                "equity_curve_updated.json",
                Ok(r#"[{"date":"2024-01-01","equity_index":1.0},{"date":"2024-01-02","equity_index":1.1}]"#),
            )
            .with(
                "benchmark_equity_curve.json",
                Ok(r#"[{"date":"2024-01-02","equity_index":0.9}]"#),
            );
        let out = load_view(&fetcher, &spec_for(ViewKind::Equity), &ShapeOptions::default());

        assert!(out.messages().is_empty());
        assert_eq!(out.primary_records, 2);
        let Shaped::Equity { rows } = out.shaped else {
            panic!("expected equity rows");
        };
        assert_eq!(rows[0].benchmark, None);
        assert_eq!(rows[1].benchmark, Some(0.9));
    }

    #[test]
    fn benchmark_failure_keeps_primary_series() {
        let fetcher = StubFetcher::new()
            .with("drawdown_updated.json", Ok(r#"[{"date":"d1","drawdown":-0.1}]"#))
            .with("benchmark_drawdown.json", Err(LoadError::Status(503)));
        let out = load_view(&fetcher, &spec_for(ViewKind::Drawdown), &ShapeOptions::default());

        assert_eq!(out.data_error, None);
        assert_eq!(out.messages(), vec!["Benchmark error: HTTP 503".to_string()]);
        assert_eq!(out.shaped.len(), 1);
    }

    #[test]
    fn primary_failure_degrades_to_empty_view() {
        let fetcher = StubFetcher::new().with("trade_distribution.json", Ok(r#"{"oops":true}"#));
        let out = load_view(&fetcher, &spec_for(ViewKind::Distribution), &ShapeOptions::default());

        assert!(out.shaped.is_empty());
        let msgs = out.messages();
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].starts_with("Data error: Expected a JSON array"));
    }

    #[test]
    fn pending_states_shape_to_empty() {
        let spec = spec_for(ViewKind::Recovery);
        let out = shape_states(&spec, &LoadState::Pending, None, &ShapeOptions::default());
        assert!(out.shaped.is_empty());
        assert!(out.messages().is_empty());
    }

    #[test]
    fn recovery_respects_bucket_option() {
        let fetcher = StubFetcher::new().with(
            "drawdown_recovery.json",
            Ok(r#"[{"recovery_days":1},{"recovery_days":3},{"recovery_days":9},{"recovery_days":11}]"#),
        );
        let spec = spec_for(ViewKind::Recovery);

        let out = load_view(&fetcher, &spec, &ShapeOptions::default());
        let Shaped::Histogram { buckets, .. } = out.shaped else {
            panic!("expected histogram");
        };
        assert_eq!(buckets.iter().map(|b| b.count).collect::<Vec<_>>(), vec![3, 1]);

        let wide = ShapeOptions::from_raw(20.0, 2.0, 0.1, 4, false).unwrap();
        let out = load_view(&fetcher, &spec, &wide);
        assert_eq!(out.shaped.len(), 1);
    }
}
