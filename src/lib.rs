//! `perf-dash` library crate.
//!
//! The binary (`dash`) is a thin wrapper around this library so the loading,
//! shaping and binding layers are testable without a terminal:
//!
//! - `data`: fetchers, record parsing, load state and background loading
//! - `shape`: pure series transforms (merge, buckets, grids, returns)
//! - `color`: diverging heat scale
//! - `views`: route table and per-view configuration
//! - `chart`: shaped rows → drawable models
//! - `tui`, `report`, `io`: the dashboard, text reports and JSON exports

pub mod app;
pub mod chart;
pub mod cli;
pub mod color;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod shape;
pub mod tui;
pub mod views;
