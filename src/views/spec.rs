//! View specification and its builder.

use serde::Serialize;

use crate::color::Rgb;
use crate::data::Record;
use crate::domain::{ShapeOptions, Shaped};
use crate::views::ViewKind;

/// Records handed to a shaping strategy. Both slices may be empty.
#[derive(Debug, Clone, Copy)]
pub struct ShapeInput<'a> {
    pub primary: &'a [Record],
    pub secondary: &'a [Record],
}

/// Shaping strategy of a view.
pub type Shaper = fn(ShapeInput<'_>, &ShapeOptions) -> Shaped;

/// How tick values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisFormat {
    Plain,
    Decimal2,
    /// Whole numbers only (counts).
    Integer,
    /// Fractions as whole percents (`-0.12` → `-12%`).
    Percent0,
    /// Fractions as percents with one decimal.
    Percent1,
    /// Fractions as percents with two decimals.
    Percent2,
    /// Already in percent units (`2.5` → `2.5%`).
    PercentUnits,
}

impl AxisFormat {
    pub fn format(self, v: f64) -> String {
        if !v.is_finite() {
            return String::new();
        }
        match self {
            AxisFormat::Plain => format!("{v:.1}"),
            AxisFormat::Decimal2 => format!("{v:.2}"),
            AxisFormat::Integer => format!("{:.0}", v.round()),
            AxisFormat::Percent0 => format!("{:.0}%", v * 100.0),
            AxisFormat::Percent1 => format!("{:.1}%", v * 100.0),
            AxisFormat::Percent2 => format!("{:.2}%", v * 100.0),
            AxisFormat::PercentUnits => format!("{v:.1}%"),
        }
    }
}

/// How the y range is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum YDomain {
    /// Fit the data with a small pad.
    Auto,
    /// Always exactly this range.
    Fixed { lo: f64, hi: f64 },
    /// Fit the data, but never narrower than this range.
    Include { lo: f64, hi: f64 },
}

/// Reference line drawn across the plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "axis", rename_all = "snake_case")]
pub enum RefLine {
    Vertical { x: f64, color: Rgb },
    Horizontal { y: f64, color: Rgb },
}

/// Declarative chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_format: AxisFormat,
    pub y_format: AxisFormat,
    pub y_domain: YDomain,
    pub primary_color: Rgb,
    pub secondary_color: Rgb,
    pub primary_label: &'static str,
    pub secondary_label: &'static str,
    pub ref_lines: Vec<RefLine>,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            x_label: "",
            y_label: "",
            x_format: AxisFormat::Plain,
            y_format: AxisFormat::Plain,
            y_domain: YDomain::Auto,
            primary_color: crate::views::catalog::GOLD,
            secondary_color: crate::views::catalog::GRAY,
            primary_label: "",
            secondary_label: "",
            ref_lines: Vec::new(),
        }
    }
}

/// A complete, data-driven view definition.
#[derive(Debug, Clone)]
pub struct ViewSpec {
    pub kind: ViewKind,
    pub title: &'static str,
    /// Main resource; failure shows as `Data error`.
    pub primary: &'static str,
    /// Optional comparison resource; failure shows as `Benchmark error`.
    pub secondary: Option<&'static str>,
    pub shaper: Shaper,
    pub chart: ChartSpec,
}

impl ViewSpec {
    pub fn builder(kind: ViewKind, primary: &'static str, shaper: Shaper) -> ViewSpecBuilder {
        ViewSpecBuilder {
            kind,
            title: kind.display_name(),
            primary,
            secondary: None,
            shaper,
            chart: ChartSpec::default(),
        }
    }

    /// Resources to fetch on mount, primary first.
    pub fn resources(&self) -> Vec<&'static str> {
        let mut out = vec![self.primary];
        out.extend(self.secondary);
        out
    }

    pub fn shape(&self, input: ShapeInput<'_>, options: &ShapeOptions) -> Shaped {
        (self.shaper)(input, options)
    }
}

/// Builder for [`ViewSpec`].
#[derive(Debug, Clone)]
pub struct ViewSpecBuilder {
    kind: ViewKind,
    title: &'static str,
    primary: &'static str,
    secondary: Option<&'static str>,
    shaper: Shaper,
    chart: ChartSpec,
}

impl ViewSpecBuilder {
    pub fn title(mut self, title: &'static str) -> Self {
        self.title = title;
        self
    }

    pub fn benchmark(mut self, name: &'static str) -> Self {
        self.secondary = Some(name);
        self
    }

    pub fn chart(mut self, chart: ChartSpec) -> Self {
        self.chart = chart;
        self
    }

    pub fn build(self) -> ViewSpec {
        ViewSpec {
            kind: self.kind,
            title: self.title,
            primary: self.primary,
            secondary: self.secondary,
            shaper: self.shaper,
            chart: self.chart,
        }
    }
}
