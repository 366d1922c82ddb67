//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the shaping layer
//! - rendered by the TUI and the text report
//! - exported to JSON

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::AppError;

/// Width of a histogram bucket; always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BucketWidth(f64);

impl BucketWidth {
    pub fn new(width: f64) -> Option<Self> {
        if width.is_finite() && width > 0.0 {
            Some(Self(width))
        } else {
            None
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// One fixed-width histogram bucket `[lower, upper)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// Median of the secondary field over the bucket's members, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
}

/// Year → 12 monthly slots (`[0]` = January). Missing months are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeatGrid {
    pub years: BTreeMap<i32, [Option<f64>; 12]>,
}

impl HeatGrid {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        if !(1..=12).contains(&month) {
            return None;
        }
        self.years.get(&year)?[(month - 1) as usize]
    }

    /// Keep only the most recent `n` years.
    pub fn last_years(&self, n: usize) -> HeatGrid {
        let skip = self.years.len().saturating_sub(n);
        HeatGrid {
            years: self
                .years
                .iter()
                .skip(skip)
                .map(|(y, row)| (*y, *row))
                .collect(),
        }
    }
}

/// Primary equity index with the benchmark aligned by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityRow {
    pub date: String,
    pub equity_index: Option<f64>,
    pub benchmark: Option<f64>,
}

/// Portfolio drawdown with the benchmark drawdown aligned by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownRow {
    pub date: String,
    pub drawdown: Option<f64>,
    pub benchmark: Option<f64>,
}

/// Deepest point of a drawdown series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxDrawdown {
    pub index: usize,
    pub date: String,
    pub drawdown: f64,
}

/// Two-sleeve allocation as shares of the total (sum to 1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationRow {
    pub date: String,
    pub aggressive: f64,
    pub reserve: f64,
}

/// One precomputed trade-return bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBin {
    pub left: f64,
    pub right: f64,
    pub center: f64,
    pub count: f64,
    pub label: String,
}

/// Scatter point: drawdown against return normalized to the first observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskReturnPoint {
    pub drawdown: f64,
    #[serde(rename = "return")]
    pub ret: f64,
}

/// Shaped output of a view, ready for a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shaped {
    Equity {
        rows: Vec<EquityRow>,
    },
    Drawdown {
        rows: Vec<DrawdownRow>,
        max: Option<MaxDrawdown>,
    },
    Allocation {
        rows: Vec<AllocationRow>,
    },
    Heatmap {
        grid: HeatGrid,
        /// Months as rows and years as columns.
        compact: bool,
    },
    Distribution {
        bins: Vec<DistributionBin>,
    },
    Histogram {
        buckets: Vec<Bucket>,
        /// Unit suffix for bucket labels (`d`, `%`).
        unit: String,
    },
    RiskReturn {
        points: Vec<RiskReturnPoint>,
    },
}

impl Shaped {
    /// Number of rows/cells/points the chart will draw.
    pub fn len(&self) -> usize {
        match self {
            Shaped::Equity { rows } => rows.len(),
            Shaped::Drawdown { rows, .. } => rows.len(),
            Shaped::Allocation { rows } => rows.len(),
            Shaped::Heatmap { grid, .. } => grid.years.len() * 12,
            Shaped::Distribution { bins } => bins.len(),
            Shaped::Histogram { buckets, .. } => buckets.len(),
            Shaped::RiskReturn { points } => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tunables for the shaping layer.
///
/// Several of the source dashboards disagreed on bucket widths, so these are
/// configuration rather than constants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeOptions {
    /// Recovery-time histogram width, in days.
    pub recovery_bucket: BucketWidth,
    /// Drawdown-depth bucket width, in percentage points.
    pub depth_bucket: BucketWidth,
    /// Heatmap color domain half-width (`0.10` = ±10%).
    pub heat_max: f64,
    /// Years kept by the compact heatmap.
    pub compact_years: usize,
    /// Overlay the benchmark series where a view has one.
    pub show_benchmark: bool,
}

pub const DEFAULT_RECOVERY_BUCKET_DAYS: f64 = 10.0;
pub const DEFAULT_DEPTH_BUCKET_PCT: f64 = 2.0;
pub const DEFAULT_HEAT_MAX: f64 = 0.10;
pub const DEFAULT_COMPACT_YEARS: usize = 4;

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            recovery_bucket: BucketWidth(DEFAULT_RECOVERY_BUCKET_DAYS),
            depth_bucket: BucketWidth(DEFAULT_DEPTH_BUCKET_PCT),
            heat_max: DEFAULT_HEAT_MAX,
            compact_years: DEFAULT_COMPACT_YEARS,
            show_benchmark: false,
        }
    }
}

impl ShapeOptions {
    /// Validate raw values (typically from CLI flags).
    pub fn from_raw(
        recovery_bucket: f64,
        depth_bucket: f64,
        heat_max: f64,
        compact_years: usize,
        show_benchmark: bool,
    ) -> Result<Self, AppError> {
        let recovery_bucket = BucketWidth::new(recovery_bucket).ok_or_else(|| {
            AppError::new(2, format!("Invalid recovery bucket width {recovery_bucket} (must be > 0)."))
        })?;
        let depth_bucket = BucketWidth::new(depth_bucket).ok_or_else(|| {
            AppError::new(2, format!("Invalid depth bucket width {depth_bucket} (must be > 0)."))
        })?;
        if !(heat_max.is_finite() && heat_max > 0.0) {
            return Err(AppError::new(2, format!("Invalid heat max {heat_max} (must be > 0).")));
        }
        if compact_years == 0 {
            return Err(AppError::new(2, "Compact heatmap needs at least one year."));
        }
        Ok(Self {
            recovery_bucket,
            depth_bucket,
            heat_max,
            compact_years,
            show_benchmark,
        })
    }
}

/// Resolved dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashConfig {
    /// Base URL or directory the resources are read from.
    pub source: String,
    pub shape: ShapeOptions,
    pub log_file: Option<std::path::PathBuf>,
}
