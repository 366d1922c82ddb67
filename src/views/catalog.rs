//! The concrete view definitions.

use crate::color::Rgb;
use crate::domain::{ShapeOptions, Shaped};
use crate::shape;
use crate::views::ViewKind;
use crate::views::spec::{AxisFormat, ChartSpec, RefLine, ShapeInput, ViewSpec, YDomain};

pub const GOLD: Rgb = Rgb(0xC9, 0xA2, 0x4D);
pub const GRAY: Rgb = Rgb(0x77, 0x77, 0x77);
pub const LIGHT_BLUE: Rgb = Rgb(0x66, 0xB6, 0xFF);
pub const RED: Rgb = Rgb(0xD9, 0x4B, 0x4B);
pub const ORANGE: Rgb = Rgb(0xF2, 0xA2, 0x3A);
pub const ZERO_RED: Rgb = Rgb(0xE0, 0x3A, 0x3A);
pub const GRID: Rgb = Rgb(0x22, 0x22, 0x22);

/// Build the configuration for a view.
pub fn spec_for(kind: ViewKind) -> ViewSpec {
    let builder = match kind {
        ViewKind::Equity => ViewSpec::builder(kind, "equity_curve_updated.json", shape_equity)
            .title("Equity curve")
            .benchmark("benchmark_equity_curve.json")
            .chart(ChartSpec {
                x_label: "date",
                y_label: "equity index",
                primary_color: GOLD,
                secondary_color: LIGHT_BLUE,
                primary_label: "Strategy",
                secondary_label: "S&P 500",
                ..ChartSpec::default()
            }),
        ViewKind::Drawdown => ViewSpec::builder(kind, "drawdown_updated.json", shape_drawdown)
            .title("Drawdown")
            .benchmark("benchmark_drawdown.json")
            .chart(ChartSpec {
                x_label: "date",
                y_label: "drawdown",
                y_format: AxisFormat::Percent0,
                y_domain: YDomain::Include { lo: -0.30, hi: 0.0 },
                primary_color: RED,
                secondary_color: ORANGE,
                primary_label: "Drawdown",
                secondary_label: "S&P 500 Drawdown",
                ..ChartSpec::default()
            }),
        ViewKind::Allocation => ViewSpec::builder(kind, "allocation_two_sleeve.json", shape_allocation)
            .title("Allocation")
            .chart(ChartSpec {
                x_label: "date",
                y_label: "share",
                y_format: AxisFormat::Percent0,
                y_domain: YDomain::Fixed { lo: 0.0, hi: 1.0 },
                primary_color: GOLD,
                secondary_color: GRAY,
                primary_label: "Main Strategy",
                secondary_label: "Reserve Fund",
                ..ChartSpec::default()
            }),
        ViewKind::Monthly => ViewSpec::builder(kind, "monthly_returns.json", shape_monthly)
            .title("Monthly returns")
            .chart(ChartSpec {
                y_format: AxisFormat::Percent2,
                ..ChartSpec::default()
            }),
        ViewKind::MobileHeatmap => ViewSpec::builder(kind, "monthly_returns.json", shape_compact_heatmap)
            .title("Monthly returns (recent years)")
            .chart(ChartSpec {
                y_format: AxisFormat::Percent2,
                ..ChartSpec::default()
            }),
        ViewKind::Distribution => ViewSpec::builder(kind, "trade_distribution.json", shape_distribution)
            .title("Trade distribution")
            .chart(ChartSpec {
                x_label: "trade return",
                y_label: "count",
                x_format: AxisFormat::Decimal2,
                y_format: AxisFormat::Integer,
                primary_label: "Count",
                ref_lines: vec![RefLine::Vertical { x: 0.0, color: ZERO_RED }],
                ..ChartSpec::default()
            }),
        ViewKind::Recovery => ViewSpec::builder(kind, "drawdown_recovery.json", shape_recovery)
            .title("Drawdown recovery")
            .chart(ChartSpec {
                x_label: "recovery (days)",
                y_label: "drawdowns",
                x_format: AxisFormat::Plain,
                y_format: AxisFormat::Integer,
                primary_label: "Drawdowns",
                ..ChartSpec::default()
            }),
        ViewKind::RecoveryDepth => ViewSpec::builder(kind, "drawdown_recovery.json", shape_recovery_depth)
            .title("Recovery by drawdown depth")
            .chart(ChartSpec {
                x_label: "depth (%)",
                y_label: "drawdowns",
                x_format: AxisFormat::PercentUnits,
                y_format: AxisFormat::Integer,
                primary_label: "Drawdowns",
                secondary_label: "Median recovery (days)",
                ..ChartSpec::default()
            }),
        ViewKind::RiskReturn => ViewSpec::builder(kind, "equity_chart_data.json", shape_risk_return)
            .title("Risk vs return")
            .chart(ChartSpec {
                x_label: "drawdown",
                y_label: "return",
                x_format: AxisFormat::Percent0,
                y_format: AxisFormat::Percent0,
                primary_label: "Return",
                ref_lines: vec![
                    RefLine::Vertical { x: 0.0, color: GRID },
                    RefLine::Horizontal { y: 0.0, color: GRID },
                ],
                ..ChartSpec::default()
            }),
    };

    builder.build()
}

fn shape_equity(input: ShapeInput<'_>, _: &ShapeOptions) -> Shaped {
    Shaped::Equity {
        rows: shape::equity_rows(input.primary, input.secondary),
    }
}

fn shape_drawdown(input: ShapeInput<'_>, _: &ShapeOptions) -> Shaped {
    let rows = shape::drawdown_rows(input.primary, input.secondary);
    let max = shape::max_drawdown(&rows);
    Shaped::Drawdown { rows, max }
}

fn shape_allocation(input: ShapeInput<'_>, _: &ShapeOptions) -> Shaped {
    Shaped::Allocation {
        rows: shape::allocation_rows(input.primary),
    }
}

fn shape_monthly(input: ShapeInput<'_>, _: &ShapeOptions) -> Shaped {
    Shaped::Heatmap {
        grid: shape::monthly_grid(input.primary),
        compact: false,
    }
}

fn shape_compact_heatmap(input: ShapeInput<'_>, options: &ShapeOptions) -> Shaped {
    Shaped::Heatmap {
        grid: shape::monthly_grid(input.primary).last_years(options.compact_years),
        compact: true,
    }
}

fn shape_distribution(input: ShapeInput<'_>, _: &ShapeOptions) -> Shaped {
    Shaped::Distribution {
        bins: shape::distribution_bins(input.primary),
    }
}

fn shape_recovery(input: ShapeInput<'_>, options: &ShapeOptions) -> Shaped {
    Shaped::Histogram {
        buckets: shape::recovery_histogram(input.primary, options.recovery_bucket),
        unit: "d".to_string(),
    }
}

fn shape_recovery_depth(input: ShapeInput<'_>, options: &ShapeOptions) -> Shaped {
    Shaped::Histogram {
        buckets: shape::depth_buckets(input.primary, options.depth_bucket),
        unit: "%".to_string(),
    }
}

fn shape_risk_return(input: ShapeInput<'_>, _: &ShapeOptions) -> Shaped {
    Shaped::RiskReturn {
        points: shape::risk_return_points(input.primary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::records;
    use serde_json::json;

    #[test]
    fn every_view_builds_and_shapes_empty_input() {
        let options = ShapeOptions::default();
        for kind in ViewKind::ALL {
            let spec = spec_for(kind);
            assert_eq!(spec.kind, kind);
            assert!(spec.primary.ends_with(".json"));
            let shaped = spec.shape(ShapeInput { primary: &[], secondary: &[] }, &options);
            assert!(shaped.is_empty(), "{kind:?} should shape empty input to nothing");
        }
    }

    #[test]
    fn only_equity_and_drawdown_have_benchmarks() {
        let with_bench: Vec<ViewKind> = ViewKind::ALL
            .into_iter()
            .filter(|k| spec_for(*k).secondary.is_some())
            .collect();
        assert_eq!(with_bench, vec![ViewKind::Equity, ViewKind::Drawdown]);
    }

    #[test]
    fn compact_heatmap_respects_year_limit() {
        let rows = records(json!([
            {"year": 2020, "month": 1, "return": 0.01},
            {"year": 2021, "month": 1, "return": 0.01},
            {"year": 2022, "month": 1, "return": 0.01}
        ]));
        let options = ShapeOptions {
            compact_years: 2,
            ..ShapeOptions::default()
        };
        let shaped = spec_for(ViewKind::MobileHeatmap)
            .shape(ShapeInput { primary: &rows, secondary: &[] }, &options);
        let Shaped::Heatmap { grid, compact } = shaped else {
            panic!("expected heatmap");
        };
        assert!(compact);
        assert_eq!(grid.years.keys().copied().collect::<Vec<_>>(), vec![2021, 2022]);
    }
}
