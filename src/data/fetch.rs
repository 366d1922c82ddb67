//! Resource fetchers.
//!
//! A dashboard resource is addressed by a bare name such as
//! `equity_curve_updated.json`. Where it comes from is decided once, by the
//! configured source:
//!
//! - `http://…` / `https://…` — fetched from that base URL with caching disabled
//! - anything else — read from a local directory (the static `public/` folder)

use std::path::{Path, PathBuf};

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};

use crate::error::{AppError, LoadError};

/// Environment variable holding the default data source.
pub const SOURCE_ENV: &str = "DASH_SOURCE";

/// Fallback source when neither `--source` nor `DASH_SOURCE` is set.
pub const DEFAULT_SOURCE: &str = "public";

/// Fetch a named resource's raw body.
pub trait Fetch: Send + Sync {
    fn fetch(&self, resource: &str) -> Result<Vec<u8>, LoadError>;

    /// Human-readable description of where resources come from.
    fn describe(&self) -> String;
}

/// Fetches resources relative to an HTTP base URL.
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base: &str) -> Result<Self, AppError> {
        // `Url::join` replaces the last path segment unless the base ends in '/'.
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalized)
            .map_err(|e| AppError::new(2, format!("Invalid source URL '{base}': {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base })
    }

    fn url_for(&self, resource: &str) -> Result<Url, LoadError> {
        self.base
            .join(resource.trim_start_matches('/'))
            .map_err(|e| LoadError::Transport(format!("Invalid resource '{resource}': {e}")))
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, resource: &str) -> Result<Vec<u8>, LoadError> {
        let url = self.url_for(resource)?;
        tracing::debug!(%url, "GET");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| LoadError::Transport(format!("Request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        let body = resp
            .bytes()
            .map_err(|e| LoadError::Transport(format!("Failed to read body: {e}")))?;
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// Reads resources from a local directory.
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Fetch for DirFetcher {
    fn fetch(&self, resource: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.root.join(resource.trim_start_matches('/'));
        tracing::debug!(path = %path.display(), "read");
        std::fs::read(&path)
            .map_err(|e| LoadError::Transport(format!("Failed to read '{}': {e}", path.display())))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Build the fetcher for a source string.
pub fn fetcher_for(source: &str) -> Result<Box<dyn Fetch>, AppError> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(AppError::new(2, "Empty data source."));
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(Box::new(HttpFetcher::new(trimmed)?))
    } else {
        Ok(Box::new(DirFetcher::new(trimmed)))
    }
}

/// Resolve the data source: explicit flag, then `.env`/environment, then default.
pub fn resolve_source(flag: Option<&str>) -> String {
    if let Some(s) = flag {
        return s.to_string();
    }
    dotenvy::dotenv().ok();
    std::env::var(SOURCE_ENV).unwrap_or_else(|_| DEFAULT_SOURCE.to_string())
}
