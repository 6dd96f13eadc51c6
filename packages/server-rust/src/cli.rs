//! Command-line and environment configuration.

use std::time::Duration;

use clap::Parser;

use crate::catalog::CatalogConfig;
use crate::network::NetworkConfig;
use crate::observability::LogFormat;

/// Showroom inventory server
#[derive(Debug, Clone, Parser)]
#[command(name = "showroom-server", version, about)]
pub struct ServerArgs {
    /// Sheet endpoint delivering the inventory JSON
    #[arg(long, env = "SHOWROOM_SOURCE_URL")]
    pub source_url: String,

    /// Address to bind
    #[arg(long, env = "SHOWROOM_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on (0 picks a free port)
    #[arg(long, env = "SHOWROOM_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Allowed CORS origins, comma separated
    #[arg(long, env = "SHOWROOM_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    pub cors_origins: Vec<String>,

    /// Catalog fetch timeout in seconds
    #[arg(long, env = "SHOWROOM_FETCH_TIMEOUT_SECS", default_value_t = 10)]
    pub fetch_timeout_secs: u64,

    /// Request timeout in seconds
    #[arg(long, env = "SHOWROOM_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Do not append the cache-busting `time` parameter to catalog fetches
    #[arg(long, env = "SHOWROOM_NO_CACHE_BUST")]
    pub no_cache_bust: bool,

    /// Log output format
    #[arg(long, env = "SHOWROOM_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl ServerArgs {
    #[must_use]
    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..NetworkConfig::default()
        }
    }

    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            source_url: self.source_url.clone(),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            cache_bust: !self.no_cache_bust,
        }
    }
}
