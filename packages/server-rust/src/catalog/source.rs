//! HTTP transport for the sheet payload.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::{Client, Url};
use showroom_core::{LoadError, SheetSource};
use tracing::debug;

use super::CatalogConfig;

/// Query parameter carrying the cache-busting timestamp.
pub const CACHE_BUST_PARAM: &str = "time";

/// Fetches the sheet with a single GET. No retries.
#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    client: Client,
    url: Url,
    cache_bust: bool,
}

impl HttpSheetSource {
    /// Builds a source from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Transport`] if the URL does not parse or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &CatalogConfig) -> Result<Self, LoadError> {
        let url = Url::parse(&config.source_url)
            .map_err(|e| LoadError::Transport(format!("invalid source url {:?}: {e}", config.source_url)))?;
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url,
            cache_bust: config.cache_bust,
        })
    }

    /// The URL a fetch issued now would request.
    #[must_use]
    pub fn request_url(&self) -> Url {
        let mut url = self.url.clone();
        if self.cache_bust {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_millis());
            url.query_pairs_mut()
                .append_pair(CACHE_BUST_PARAM, &millis.to_string());
        }
        url
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch(&self) -> Result<serde_json::Value, LoadError> {
        let url = self.request_url();
        debug!(%url, "fetching sheet");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use showroom_core::Catalog;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn source_for(server: &MockServer, cache_bust: bool) -> HttpSheetSource {
        HttpSheetSource::new(&CatalogConfig {
            source_url: format!("{}/inventory.json", server.uri()),
            cache_bust,
            ..CatalogConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_url_is_transport_error() {
        let err = HttpSheetSource::new(&CatalogConfig {
            source_url: "not a url".to_string(),
            ..CatalogConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, LoadError::Transport(_)));
    }

    #[test]
    fn request_url_appends_time_when_enabled() {
        let config = CatalogConfig {
            source_url: "http://sheets.test/inventory.json?sheet=used".to_string(),
            ..CatalogConfig::default()
        };
        let source = HttpSheetSource::new(&config).unwrap();
        let url = source.request_url();
        let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["sheet", CACHE_BUST_PARAM]);

        let plain = HttpSheetSource::new(&CatalogConfig {
            cache_bust: false,
            ..config
        })
        .unwrap();
        assert_eq!(
            plain.request_url().as_str(),
            "http://sheets.test/inventory.json?sheet=used"
        );
    }

    #[tokio::test]
    async fn loads_multi_sheet_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/inventory.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                ":type": "multi-sheet",
                ":names": ["new", "used"],
                "new": { "data": [{ "id": "n1", "condition": "New", "make": "Honda" }] },
                "used": { "data": [{ "id": "u1", "condition": "Used", "make": "Ford" }] },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = Catalog::load(&source_for(&server, true)).await.unwrap();
        let ids: Vec<&str> = catalog.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "u1"]);

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0]
            .url
            .query_pairs()
            .any(|(k, _)| k == CACHE_BUST_PARAM));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = source_for(&server, false).fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 500 }));
    }

    #[tokio::test]
    async fn html_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = source_for(&server, false).fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[tokio::test]
    async fn unknown_sheet_type_fails_the_load() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ ":type": "pivot", "data": [] })),
            )
            .mount(&server)
            .await;

        let err = Catalog::load(&source_for(&server, false)).await.unwrap_err();
        assert_eq!(err.to_string(), "unknown sheet-type: pivot");
    }
}
