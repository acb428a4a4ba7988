//! Wiki API client.

use super::types::WikiPageResponse;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::config::WikiConfig;
use std::time::Duration;
use tracing::{debug, warn};

/// Errors raised while fetching a wiki page
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to decode wiki page from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("wiki page {0} not found")]
    NotFound(String),
}

/// Anything that can hand out the raw `content_html` of a wiki page
#[async_trait]
pub trait WikiSource: Send + Sync {
    /// Fetch the still-escaped content HTML of `page` (e.g. `year_index`, `2010`)
    async fn fetch_content_html(&self, page: &str) -> Result<String, FetchError>;
}

/// Reddit wiki JSON client
///
/// Requests are issued once; there is no retry or rate limiting.
pub struct WikiClient {
    /// HTTP client
    client: Client,
    /// Base URL plus wiki path, without trailing slash
    wiki_url: String,
}

impl WikiClient {
    /// Create a new wiki client
    pub fn new(config: &WikiConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|source| FetchError::Transport {
            url: config.base_url.clone(),
            source,
        })?;

        Ok(Self {
            client,
            wiki_url: wiki_url(&config.base_url, &config.wiki_path),
        })
    }

    /// URL of the JSON representation of `page`
    pub fn page_url(&self, page: &str) -> String {
        format!("{}/{}.json", self.wiki_url, page)
    }
}

#[async_trait]
impl WikiSource for WikiClient {
    async fn fetch_content_html(&self, page: &str) -> Result<String, FetchError> {
        let url = self.page_url(page);
        debug!(url = %url, "Fetching wiki page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!(url = %url, "Wiki page does not exist");
            return Err(FetchError::NotFound(page.to_string()));
        }
        if !status.is_success() {
            warn!(url = %url, status = %status, "Wiki request failed");
            return Err(FetchError::Status { url, status });
        }

        let page: WikiPageResponse = response
            .json()
            .await
            .map_err(|source| FetchError::Decode {
                url: url.clone(),
                source,
            })?;

        debug!(
            url = %url,
            bytes = page.data.content_html.len(),
            "Wiki page fetched"
        );
        Ok(page.data.content_html)
    }
}

fn wiki_url(base_url: &str, wiki_path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        wiki_path.trim_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> WikiConfig {
        WikiConfig {
            base_url: server.uri(),
            ..WikiConfig::default()
        }
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = WikiClient::new(&WikiConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_page_url() {
        let client = WikiClient::new(&WikiConfig::default()).unwrap();
        assert_eq!(
            client.page_url("year_index"),
            "https://www.reddit.com/r/AnimeThemes/wiki/year_index.json"
        );
        assert_eq!(
            client.page_url("2010"),
            "https://www.reddit.com/r/AnimeThemes/wiki/2010.json"
        );
    }

    #[test]
    fn test_wiki_url_slashes() {
        assert_eq!(
            wiki_url("https://reddit.com/", "/r/AnimeThemes/wiki/"),
            "https://reddit.com/r/AnimeThemes/wiki"
        );
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/r/AnimeThemes/wiki/year_index.json"))
            .and(header("user-agent", "animethemes-scraper 1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "wikipage",
                "data": { "content_html": "&lt;h3&gt;2010&lt;/h3&gt;" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = WikiClient::new(&config_for(&server)).unwrap();
        let html = client.fetch_content_html("year_index").await.unwrap();
        assert_eq!(html, "&lt;h3&gt;2010&lt;/h3&gt;");
    }

    #[tokio::test]
    async fn test_fetch_missing_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/r/AnimeThemes/wiki/1990.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = WikiClient::new(&config_for(&server)).unwrap();
        let err = client.fetch_content_html("1990").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(ref page) if page == "1990"));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = WikiClient::new(&config_for(&server)).unwrap();
        let err = client.fetch_content_html("2010").await.unwrap_err();
        match err {
            FetchError::Status { url, status } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert!(url.ends_with("/r/AnimeThemes/wiki/2010.json"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
            .mount(&server)
            .await;

        let client = WikiClient::new(&config_for(&server)).unwrap();
        let err = client.fetch_content_html("2010").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let config = WikiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..WikiConfig::default()
        };

        let client = WikiClient::new(&config).unwrap();
        let err = client.fetch_content_html("2010").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
