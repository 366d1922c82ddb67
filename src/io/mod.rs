//! Output helpers: shaped-view JSON exports (`export`).

pub mod export;

pub use export::*;
