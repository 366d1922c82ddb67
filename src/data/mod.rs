//! Resource loading: fetchers, flat records, and load state.

pub mod fetch;
pub mod loader;
pub mod record;
#[cfg(test)]
pub(crate) mod stub;

pub use fetch::{DirFetcher, Fetch, HttpFetcher, fetcher_for, resolve_source};
pub use loader::{LoadState, Loaded, Loader, ResourceSlot, Ticket, load};
pub use record::{Record, field_f64, field_i64, field_str, first_f64, parse_records};
