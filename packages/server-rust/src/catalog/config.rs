//! Catalog source configuration.

use std::time::Duration;

/// Where the catalog comes from and how it is fetched.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// URL of the sheet endpoint (JSON).
    pub source_url: String,
    /// Upper bound on a single fetch, including reading the body.
    pub fetch_timeout: Duration,
    /// Append a `time=<millis>` query parameter so intermediaries never
    /// serve a stale sheet.
    pub cache_bust: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source_url: "http://localhost:3000/inventory.json".to_string(),
            fetch_timeout: Duration::from_secs(10),
            cache_bust: true,
        }
    }
}
