//! DuckDuckGo HTML endpoint as the web search provider.

mod parse;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::search::provider::{SearchError, SearchProvider};
use crate::search::types::RawResult;

const API_BASE: &str = "https://html.duckduckgo.com";

#[derive(Clone, Debug)]
pub struct DuckDuckGoClient {
    http: Client,
    base_url: String,
}

impl DuckDuckGoClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }
}

impl SearchProvider for DuckDuckGoClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawResult>, SearchError> {
        let endpoint = format!("{}/html/", self.base_url);
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("q", query)
            .finish();

        let response = self
            .http
            .post(&endpoint)
            .header("User-Agent", crate::USER_AGENT)
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        // 202 carries an anomaly challenge page instead of results.
        if status == StatusCode::ACCEPTED || status == StatusCode::FORBIDDEN {
            warn!(status = %status, "DuckDuckGo blocked the request");
            return Err(SearchError::Blocked(status.as_u16()));
        }
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        let results = parse::parse_results(&html, max_results)?;
        debug!(query, bytes = html.len(), count = results.len(), "DuckDuckGo results parsed");
        Ok(results)
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html><body>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://www.linkedin.com/in/sarah-chen">Sarah Chen - Staff Engineer | LinkedIn</a>
    <a class="result__snippet">Staff Engineer at Google. Location: New York</a>
</div>
</body></html>"#;

    #[tokio::test]
    async fn search_posts_query_and_parses_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/html/"))
            .and(body_string_contains("q=%22Sarah+Chen%22"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let client = DuckDuckGoClient::with_base_url(Client::new(), &server.uri());
        let results = client.search("\"Sarah Chen\" site:linkedin.com/in", 10).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://www.linkedin.com/in/sarah-chen");
        assert!(results[0].snippet.contains("Google"));
    }

    #[tokio::test]
    async fn search_202_is_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(202).set_body_string("anomaly"))
            .mount(&server)
            .await;

        let client = DuckDuckGoClient::with_base_url(Client::new(), &server.uri());
        let result = client.search("anything", 10).await;
        assert!(matches!(result, Err(SearchError::Blocked(202))));
    }

    #[tokio::test]
    async fn search_500_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = DuckDuckGoClient::with_base_url(Client::new(), &server.uri());
        let result = client.search("anything", 10).await;
        assert!(matches!(result, Err(SearchError::Status(500))));
    }
}
