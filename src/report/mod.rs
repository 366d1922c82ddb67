//! Text reports for `dash show` and `dash routes`.
//!
//! Formatting lives here so loading and shaping stay free of presentation.

pub mod format;

use crate::app::pipeline::ViewOutput;
use crate::domain::{ShapeOptions, Shaped};
use crate::views::{DEFAULT_VIEW, ViewKind, ViewSpec, spec_for};

pub use format::*;

/// Header, inline errors, then the view's table.
pub fn format_view_report(spec: &ViewSpec, output: &ViewOutput, options: &ShapeOptions) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ({}) ===\n", spec.title, spec.kind.path()));
    out.push_str(&format!("Resources: {}\n", spec.resources().join(", ")));
    out.push_str(&format!("Records: {} | shaped: {}\n", output.primary_records, output.shaped.len()));
    for msg in output.messages() {
        out.push_str(&msg);
        out.push('\n');
    }
    out.push('\n');

    if output.shaped.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let table = match &output.shaped {
        Shaped::Equity { rows } => format_equity(rows, options.show_benchmark),
        Shaped::Drawdown { rows, max } => format_drawdown(rows, max.as_ref(), options.show_benchmark),
        Shaped::Allocation { rows } => format_allocation(rows),
        Shaped::Heatmap { grid, compact } => format_heat_grid(grid, *compact),
        Shaped::Distribution { bins } => format_distribution(bins),
        Shaped::Histogram { buckets, unit } => format_buckets(buckets, unit),
        Shaped::RiskReturn { points } => format_risk_return(points),
    };
    out.push_str(&table);
    out
}

/// Route table, with the `/` redirect first.
pub fn format_routes() -> String {
    let mut out = format!("{:<16} {:<32} {}\n", "route", "title", "resources");
    out.push_str(&format!("{:<16} {:<32} {}\n", "/", format!("→ {}", DEFAULT_VIEW.path()), ""));
    for kind in ViewKind::ALL {
        let spec = spec_for(kind);
        out.push_str(&format!("{:<16} {:<32} {}\n", kind.path(), spec.title, spec.resources().join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::load_view;
    use crate::data::stub::StubFetcher;
    use crate::error::LoadError;

    #[test]
    fn routes_list_every_view() {
        let text = format_routes();
        assert!(text.contains("→ /equity"));
        for kind in ViewKind::ALL {
            assert!(text.contains(kind.path()), "{kind:?}");
        }
        assert!(text.contains("benchmark_drawdown.json"));
    }

    #[test]
    fn failed_view_report_shows_inline_error() {
        let fetcher = StubFetcher::new().with("monthly_returns.json", Err(LoadError::Status(500)));
        let spec = spec_for(ViewKind::Monthly);
        let options = ShapeOptions::default();
        let text = format_view_report(&spec, &load_view(&fetcher, &spec, &options), &options);
        assert!(text.contains("Data error: HTTP 500"));
        assert!(text.contains("(no data)"));
    }

    #[test]
    fn drawdown_report_includes_max() {
        let fetcher = StubFetcher::new()
            .with(
                "drawdown_updated.json",
                Ok(r#"[{"date":"2024-01-01","drawdown":0},{"date":"2024-01-05","drawdown":-0.2}]"#),
            )
            .with("benchmark_drawdown.json", Ok("[]"));
        let spec = spec_for(ViewKind::Drawdown);
        let options = ShapeOptions::default();
        let text = format_view_report(&spec, &load_view(&fetcher, &spec, &options), &options);
        assert!(text.contains("Max drawdown: -20.00% on 2024-01-05"));
        assert!(text.contains("(4 days)"));
    }
}
