//! Named dashboard views and their routes.
//!
//! A view is pure configuration (`ViewSpec`): which resources to load, which
//! shaping strategy to run, and how to chart the result. The CLI and the TUI
//! share the same generic load → shape → render path over these specs.

use serde::Serialize;

pub mod catalog;
pub mod spec;

pub use catalog::spec_for;
pub use spec::{AxisFormat, ChartSpec, RefLine, ShapeInput, Shaper, ViewSpec, ViewSpecBuilder, YDomain};

/// Every view reachable from the navigation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    Equity,
    Drawdown,
    Allocation,
    Monthly,
    Distribution,
    Recovery,
    RecoveryDepth,
    RiskReturn,
    MobileHeatmap,
}

/// Where `/` redirects.
pub const DEFAULT_VIEW: ViewKind = ViewKind::Equity;

impl ViewKind {
    /// Navigation order.
    pub const ALL: [ViewKind; 9] = [
        ViewKind::Equity,
        ViewKind::Drawdown,
        ViewKind::Allocation,
        ViewKind::Monthly,
        ViewKind::Distribution,
        ViewKind::Recovery,
        ViewKind::RecoveryDepth,
        ViewKind::RiskReturn,
        ViewKind::MobileHeatmap,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ViewKind::Equity => "/equity",
            ViewKind::Drawdown => "/drawdown",
            ViewKind::Allocation => "/allocation",
            ViewKind::Monthly => "/monthly",
            ViewKind::Distribution => "/distribution",
            ViewKind::Recovery => "/recovery",
            ViewKind::RecoveryDepth => "/recovery-depth",
            ViewKind::RiskReturn => "/riskreturn",
            ViewKind::MobileHeatmap => "/mobileheatmap",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ViewKind::Equity => "Equity",
            ViewKind::Drawdown => "Drawdown",
            ViewKind::Allocation => "Allocation",
            ViewKind::Monthly => "Monthly",
            ViewKind::Distribution => "Distribution",
            ViewKind::Recovery => "Recovery",
            ViewKind::RecoveryDepth => "Depth",
            ViewKind::RiskReturn => "Risk/Return",
            ViewKind::MobileHeatmap => "Compact",
        }
    }

    /// Resolve a route. `/` (and the empty path) redirect to the default view;
    /// the leading slash is optional.
    pub fn from_path(path: &str) -> Option<ViewKind> {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(DEFAULT_VIEW);
        }
        let with_slash = if trimmed.starts_with('/') {
            trimmed.to_ascii_lowercase()
        } else {
            format!("/{}", trimmed.to_ascii_lowercase())
        };
        ViewKind::ALL.into_iter().find(|k| k.path() == with_slash)
    }

    pub fn index(self) -> usize {
        ViewKind::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    pub fn next(self) -> ViewKind {
        ViewKind::ALL[(self.index() + 1) % ViewKind::ALL.len()]
    }

    pub fn prev(self) -> ViewKind {
        let n = ViewKind::ALL.len();
        ViewKind::ALL[(self.index() + n - 1) % n]
    }
}
