//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - shaped view outputs (`Shaped`, `Bucket`, `HeatGrid`, per-view rows)
//! - shaping tunables (`ShapeOptions`, `BucketWidth`)
//! - resolved configuration (`DashConfig`)

pub mod types;

pub use types::*;
