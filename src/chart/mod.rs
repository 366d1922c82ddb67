//! Chart binding: shaped rows + chart configuration → drawable models.
//!
//! The widgets never look at records or views. Everything they draw is
//! computed here, so bounds, gaps and colors can be tested without a terminal.

use crate::color::{CellStyle, HeatScale, Rgb};
use crate::domain::{Bucket, HeatGrid, ShapeOptions, Shaped};
use crate::shape::bucket_label;
use crate::views::{AxisFormat, ChartSpec, RefLine, YDomain};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A polyline split at missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub label: String,
    pub color: Rgb,
    pub segments: Vec<Vec<(f64, f64)>>,
}

/// A filled band between `baseline` and the points.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotArea {
    pub label: String,
    pub color: Rgb,
    pub baseline: f64,
    pub segments: Vec<Vec<(f64, f64)>>,
}

/// A vertical bar spanning `[x0, x1]` from 0 to `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotBar {
    pub x0: f64,
    pub x1: f64,
    pub y: f64,
    pub label: String,
}

/// Highlighted point with a caption (e.g. the maximum drawdown).
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub color: Rgb,
}

/// How x tick values are labelled.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// x is a row index into these date labels.
    Dates(Vec<String>),
    Numeric(AxisFormat),
}

impl XAxis {
    pub fn format(&self, v: f64) -> String {
        match self {
            XAxis::Dates(dates) => {
                if !v.is_finite() || v < 0.0 {
                    return String::new();
                }
                dates.get(v.round() as usize).cloned().unwrap_or_default()
            }
            XAxis::Numeric(fmt) => fmt.format(v),
        }
    }
}

/// Everything a cartesian chart needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotModel {
    pub areas: Vec<PlotArea>,
    pub lines: Vec<PlotLine>,
    pub bars: Vec<PlotBar>,
    pub bar_color: Rgb,
    pub points: Vec<(f64, f64)>,
    pub point_color: Rgb,
    pub ref_lines: Vec<RefLine>,
    pub marker: Option<Marker>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_axis: XAxis,
    pub y_format: AxisFormat,
    pub x_label: String,
    pub y_label: String,
    /// Legend entries `(label, color)`.
    pub legend: Vec<(String, Rgb)>,
}

/// One heat cell ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatCellView {
    pub value: Option<f64>,
    pub style: CellStyle,
    /// Hover-style caption such as `2024-3: 1.25%` or `2024-3: n/a`.
    pub caption: String,
}

/// Labelled heat grid; `rows[i].1[j]` is the cell at row `i`, column `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatModel {
    pub column_labels: Vec<String>,
    pub rows: Vec<(String, Vec<HeatCellView>)>,
    pub scale: HeatScale,
}

/// Drawable output of a view.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Plot(PlotModel),
    Heat(HeatModel),
}

/// Bind shaped rows to a drawable model.
pub fn bind(shaped: &Shaped, chart: &ChartSpec, options: &ShapeOptions) -> Binding {
    match shaped {
        Shaped::Heatmap { grid, compact } => {
            // The heat domain is validated with the rest of the options.
            let scale = HeatScale::new(options.heat_max).unwrap_or_default();
            Binding::Heat(heat_model(grid, *compact, scale))
        }
        other => Binding::Plot(plot_model(other, chart, options.show_benchmark)),
    }
}

fn plot_model(shaped: &Shaped, chart: &ChartSpec, show_benchmark: bool) -> PlotModel {
    let mut model = PlotModel {
        areas: Vec::new(),
        lines: Vec::new(),
        bars: Vec::new(),
        bar_color: chart.primary_color,
        points: Vec::new(),
        point_color: chart.primary_color,
        ref_lines: chart.ref_lines.clone(),
        marker: None,
        x_bounds: [0.0, 1.0],
        y_bounds: [0.0, 1.0],
        x_axis: XAxis::Numeric(chart.x_format),
        y_format: chart.y_format,
        x_label: chart.x_label.to_string(),
        y_label: chart.y_label.to_string(),
        legend: Vec::new(),
    };

    match shaped {
        Shaped::Equity { rows } => {
            model.x_axis = XAxis::Dates(rows.iter().map(|r| r.date.clone()).collect());
            model.lines.push(PlotLine {
                label: chart.primary_label.to_string(),
                color: chart.primary_color,
                segments: segments(rows.iter().map(|r| r.equity_index)),
            });
            model.legend.push((chart.primary_label.to_string(), chart.primary_color));
            if show_benchmark {
                model.lines.push(PlotLine {
                    label: chart.secondary_label.to_string(),
                    color: chart.secondary_color,
                    segments: segments(rows.iter().map(|r| r.benchmark)),
                });
                model.legend.push((chart.secondary_label.to_string(), chart.secondary_color));
            }
            model.x_bounds = index_bounds(rows.len());
        }
        Shaped::Drawdown { rows, max } => {
            model.x_axis = XAxis::Dates(rows.iter().map(|r| r.date.clone()).collect());
            model.areas.push(PlotArea {
                label: chart.primary_label.to_string(),
                color: chart.primary_color,
                baseline: 0.0,
                segments: segments(rows.iter().map(|r| r.drawdown)),
            });
            model.legend.push((chart.primary_label.to_string(), chart.primary_color));
            if show_benchmark {
                model.lines.push(PlotLine {
                    label: chart.secondary_label.to_string(),
                    color: chart.secondary_color,
                    segments: segments(rows.iter().map(|r| r.benchmark)),
                });
                model.legend.push((chart.secondary_label.to_string(), chart.secondary_color));
            }
            model.marker = max.as_ref().map(|m| Marker {
                x: m.index as f64,
                y: m.drawdown,
                label: format!("Max Drawdown {}", AxisFormat::Percent2.format(m.drawdown)),
                color: chart.primary_color,
            });
            model.x_bounds = index_bounds(rows.len());
        }
        Shaped::Allocation { rows } => {
            model.x_axis = XAxis::Dates(rows.iter().map(|r| r.date.clone()).collect());
            // Stack: reserve sits on top of the aggressive sleeve, so the full
            // band is drawn first and the aggressive share over it.
            model.areas.push(PlotArea {
                label: chart.secondary_label.to_string(),
                color: chart.secondary_color,
                baseline: 0.0,
                segments: segments(rows.iter().map(|r| Some(r.aggressive + r.reserve))),
            });
            model.areas.push(PlotArea {
                label: chart.primary_label.to_string(),
                color: chart.primary_color,
                baseline: 0.0,
                segments: segments(rows.iter().map(|r| Some(r.aggressive))),
            });
            model.legend.push((chart.primary_label.to_string(), chart.primary_color));
            model.legend.push((chart.secondary_label.to_string(), chart.secondary_color));
            model.x_bounds = index_bounds(rows.len());
        }
        Shaped::Distribution { bins } => {
            model.bars = bins
                .iter()
                .map(|b| PlotBar {
                    x0: b.left.min(b.right),
                    x1: b.left.max(b.right),
                    y: b.count,
                    label: b.label.clone(),
                })
                .collect();
            model.x_bounds = bar_x_bounds(&model.bars);
        }
        Shaped::Histogram { buckets, unit } => {
            model.bars = histogram_bars(buckets, unit);
            model.x_bounds = bar_x_bounds(&model.bars);
            if buckets.iter().any(|b| b.median.is_some()) {
                let centers = buckets
                    .iter()
                    .map(|b| b.median.map(|m| ((b.lower + b.upper) / 2.0, m)));
                let scaled = scale_onto_counts(centers.collect(), buckets);
                model.lines.push(PlotLine {
                    label: chart.secondary_label.to_string(),
                    color: crate::views::catalog::LIGHT_BLUE,
                    segments: scaled,
                });
                model.legend.push((chart.primary_label.to_string(), chart.primary_color));
                model.legend.push((
                    format!("{} (scaled)", chart.secondary_label),
                    crate::views::catalog::LIGHT_BLUE,
                ));
            }
        }
        Shaped::RiskReturn { points } => {
            model.points = points.iter().map(|p| (p.drawdown, p.ret)).collect();
            model.x_bounds = padded_bounds(model.points.iter().map(|p| p.0), None);
            // Drawdowns are never positive; keep the zero line at the right edge.
            model.x_bounds[1] = model.x_bounds[1].max(0.0);
        }
        Shaped::Heatmap { .. } => {}
    }

    model.y_bounds = y_bounds(&model, chart.y_domain);
    model
}

fn histogram_bars(buckets: &[Bucket], unit: &str) -> Vec<PlotBar> {
    buckets
        .iter()
        .map(|b| PlotBar {
            x0: b.lower,
            x1: b.upper,
            y: b.count as f64,
            label: bucket_label(b, unit),
        })
        .collect()
}

/// Median recovery shares the count axis; rescale it so its maximum matches
/// the tallest bar.
fn scale_onto_counts(points: Vec<Option<(f64, f64)>>, buckets: &[Bucket]) -> Vec<Vec<(f64, f64)>> {
    let max_count = buckets.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let max_median = points
        .iter()
        .flatten()
        .map(|p| p.1)
        .fold(0.0_f64, f64::max);
    let k = if max_median > 0.0 && max_count > 0.0 {
        max_count / max_median
    } else {
        1.0
    };

    let mut out = Vec::new();
    let mut current = Vec::new();
    for p in points {
        match p {
            Some((x, y)) => current.push((x, y * k)),
            None => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Split an indexed series at `None` (and non-finite) values.
pub fn segments(values: impl IntoIterator<Item = Option<f64>>) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, v) in values.into_iter().enumerate() {
        match v.filter(|v| v.is_finite()) {
            Some(y) => current.push((i as f64, y)),
            None => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn index_bounds(n: usize) -> [f64; 2] {
    if n < 2 {
        [0.0, 1.0]
    } else {
        [0.0, (n - 1) as f64]
    }
}

fn bar_x_bounds(bars: &[PlotBar]) -> [f64; 2] {
    let lo = bars.iter().map(|b| b.x0).fold(f64::INFINITY, f64::min);
    let hi = bars.iter().map(|b| b.x1).fold(f64::NEG_INFINITY, f64::max);
    if lo.is_finite() && hi.is_finite() && hi > lo {
        [lo, hi]
    } else {
        [0.0, 1.0]
    }
}

/// Min/max of finite values with a 5% pad; `[0, 1]` when degenerate.
fn padded_bounds(values: impl IntoIterator<Item = f64>, include: Option<[f64; 2]>) -> [f64; 2] {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if let Some([a, b]) = include {
        lo = lo.min(a);
        hi = hi.max(b);
    }

    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if hi <= lo {
        let half = (lo.abs() * 0.05).max(0.5);
        return [lo - half, hi + half];
    }

    let pad = ((hi - lo).abs() * 0.05).max(1e-12);
    [lo - pad, hi + pad]
}

fn y_bounds(model: &PlotModel, domain: YDomain) -> [f64; 2] {
    if let YDomain::Fixed { lo, hi } = domain {
        return [lo, hi];
    }

    let mut ys: Vec<f64> = Vec::new();
    for line in &model.lines {
        ys.extend(line.segments.iter().flatten().map(|p| p.1));
    }
    for area in &model.areas {
        ys.push(area.baseline);
        ys.extend(area.segments.iter().flatten().map(|p| p.1));
    }
    if !model.bars.is_empty() {
        ys.push(0.0);
        ys.extend(model.bars.iter().map(|b| b.y));
    }
    ys.extend(model.points.iter().map(|p| p.1));

    let include = match domain {
        YDomain::Include { lo, hi } => Some([lo, hi]),
        _ => None,
    };
    let mut bounds = padded_bounds(ys, include);

    // Bars and areas grow from zero; don't float them above the axis.
    if (!model.bars.is_empty() || !model.areas.is_empty()) && bounds[0] < 0.0 {
        let data_min = model.bars.iter().map(|b| b.y).fold(0.0_f64, f64::min);
        let area_min = model
            .areas
            .iter()
            .flat_map(|a| a.segments.iter().flatten().map(|p| p.1))
            .fold(0.0_f64, f64::min);
        if data_min >= 0.0 && area_min >= 0.0 && include.is_none_or(|[lo, _]| lo >= 0.0) {
            bounds[0] = 0.0;
        }
    }
    bounds
}

fn heat_model(grid: &HeatGrid, compact: bool, scale: HeatScale) -> HeatModel {
    let cell = |year: i32, month_idx: usize| {
        let value = grid.years.get(&year).and_then(|row| row[month_idx]);
        let caption = match value {
            Some(r) => format!("{year}-{}: {}", month_idx + 1, AxisFormat::Percent2.format(r)),
            None => format!("{year}-{}: n/a", month_idx + 1),
        };
        HeatCellView {
            value,
            style: scale.style(value),
            caption,
        }
    };

    let years: Vec<i32> = grid.years.keys().copied().collect();

    if compact {
        HeatModel {
            column_labels: years.iter().map(|y| y.to_string()).collect(),
            rows: MONTH_NAMES
                .iter()
                .enumerate()
                .map(|(m, name)| (name.to_string(), years.iter().map(|y| cell(*y, m)).collect()))
                .collect(),
            scale,
        }
    } else {
        HeatModel {
            column_labels: MONTH_NAMES.iter().map(|m| m.to_string()).collect(),
            rows: years
                .iter()
                .map(|y| (y.to_string(), (0..12).map(|m| cell(*y, m)).collect()))
                .collect(),
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DrawdownRow, EquityRow, MaxDrawdown};
    use crate::shape::grid_from_triples;
    use crate::views::{ViewKind, spec_for};

    #[test]
    fn segments_split_on_gaps() {
        let segs = segments([Some(1.0), None, Some(2.0), Some(f64::NAN), Some(3.0), Some(4.0)]);
        assert_eq!(segs, vec![vec![(0.0, 1.0)], vec![(2.0, 2.0)], vec![(4.0, 3.0), (5.0, 4.0)]]);
        assert!(segments([None, None]).is_empty());
    }

    #[test]
    fn benchmark_line_only_when_enabled() {
        let shaped = Shaped::Equity {
            rows: vec![
                EquityRow { date: "a".into(), equity_index: Some(1.0), benchmark: Some(1.0) },
                EquityRow { date: "b".into(), equity_index: Some(1.2), benchmark: None },
            ],
        };
        let chart = spec_for(ViewKind::Equity).chart;

        let mut options = ShapeOptions::default();
        let Binding::Plot(hidden) = bind(&shaped, &chart, &options) else { panic!() };
        assert_eq!(hidden.lines.len(), 1);

        options.show_benchmark = true;
        let Binding::Plot(shown) = bind(&shaped, &chart, &options) else { panic!() };
        assert_eq!(shown.lines.len(), 2);
        assert_eq!(shown.x_axis.format(1.0), "b");
        assert_eq!(shown.x_axis.format(7.0), "");
    }

    #[test]
    fn drawdown_bounds_include_fixed_floor_and_marker() {
        let shaped = Shaped::Drawdown {
            rows: vec![
                DrawdownRow { date: "a".into(), drawdown: Some(0.0), benchmark: None },
                DrawdownRow { date: "b".into(), drawdown: Some(-0.05), benchmark: None },
            ],
            max: Some(MaxDrawdown { index: 1, date: "b".into(), drawdown: -0.05 }),
        };
        let Binding::Plot(model) = bind(&shaped, &spec_for(ViewKind::Drawdown).chart, &ShapeOptions::default())
        else {
            panic!()
        };
        assert!(model.y_bounds[0] <= -0.30);
        assert!(model.y_bounds[1] >= 0.0);
        let marker = model.marker.unwrap();
        assert_eq!((marker.x, marker.y), (1.0, -0.05));
        assert_eq!(marker.label, "Max Drawdown -5.00%");
    }

    #[test]
    fn empty_views_still_get_usable_bounds() {
        for kind in ViewKind::ALL {
            let spec = spec_for(kind);
            let shaped = spec.shape(
                crate::views::ShapeInput { primary: &[], secondary: &[] },
                &ShapeOptions::default(),
            );
            if let Binding::Plot(model) = bind(&shaped, &spec.chart, &ShapeOptions::default()) {
                assert!(model.x_bounds[0] < model.x_bounds[1], "{kind:?}");
                assert!(model.y_bounds[0] < model.y_bounds[1], "{kind:?}");
            }
        }
    }

    #[test]
    fn histogram_bars_start_at_zero() {
        let shaped = Shaped::Histogram {
            buckets: vec![
                Bucket { lower: 0.0, upper: 10.0, count: 3, median: None },
                Bucket { lower: 10.0, upper: 20.0, count: 1, median: None },
            ],
            unit: "d".into(),
        };
        let Binding::Plot(model) = bind(&shaped, &spec_for(ViewKind::Recovery).chart, &ShapeOptions::default())
        else {
            panic!()
        };
        assert_eq!(model.bars.len(), 2);
        assert_eq!(model.bars[0].label, "0–10d");
        assert_eq!(model.x_bounds, [0.0, 20.0]);
        assert_eq!(model.y_bounds[0], 0.0);
        assert!(model.lines.is_empty());
    }

    #[test]
    fn median_overlay_is_scaled_to_tallest_bar() {
        let buckets = vec![
            Bucket { lower: 0.0, upper: 2.0, count: 4, median: Some(10.0) },
            Bucket { lower: 2.0, upper: 4.0, count: 0, median: None },
            Bucket { lower: 4.0, upper: 6.0, count: 2, median: Some(40.0) },
        ];
        let shaped = Shaped::Histogram { buckets, unit: "%".into() };
        let Binding::Plot(model) =
            bind(&shaped, &spec_for(ViewKind::RecoveryDepth).chart, &ShapeOptions::default())
        else {
            panic!()
        };
        let line = &model.lines[0];
        assert_eq!(line.segments, vec![vec![(1.0, 1.0)], vec![(5.0, 4.0)]]);
    }

    #[test]
    fn heat_model_layouts() {
        let grid = grid_from_triples([(2023, 1, Some(0.02)), (2024, 12, Some(-0.01))]);
        let scale = HeatScale::new(0.1).unwrap();

        let wide = heat_model(&grid, false, scale);
        assert_eq!(wide.column_labels.len(), 12);
        assert_eq!(wide.rows.len(), 2);
        assert_eq!(wide.rows[0].0, "2023");
        assert_eq!(wide.rows[0].1.len(), 12);
        assert_eq!(wide.rows[0].1[0].caption, "2023-1: 2.00%");
        assert_eq!(wide.rows[0].1[1].caption, "2023-2: n/a");
        assert_eq!(wide.rows[0].1[1].style, CellStyle::NoData);

        let compact = heat_model(&grid, true, scale);
        assert_eq!(compact.column_labels, vec!["2023", "2024"]);
        assert_eq!(compact.rows.len(), 12);
        assert_eq!(compact.rows[11].0, "Dec");
        assert_eq!(compact.rows[11].1[1].value, Some(-0.01));
    }
}
