//! Series shaping: pure transforms from records to chart-ready rows.
//!
//! - histogram bucketing + medians (`bucket`)
//! - key-aligned merge of two series (`merge`)
//! - year × month grid (`grid`)
//! - normalized returns (`normalize`)
//! - per-view row builders (`series`)

pub mod bucket;
pub mod grid;
pub mod merge;
pub mod normalize;
pub mod series;

pub use bucket::{bucket_label, bucketize, bucketize_with, median};
pub use grid::{grid_from_triples, monthly_grid};
pub use merge::merge_by_key;
pub use normalize::{normalize_returns, risk_return_points};
pub use series::*;
