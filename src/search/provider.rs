use super::types::RawResult;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("search provider returned status {0}")]
    Status(u16),

    #[error("search provider is challenging automated requests (status {0})")]
    Blocked(u16),

    #[error("could not parse search results: {0}")]
    Parse(String),

    #[error("search timed out after {0}s")]
    Timeout(u64),
}

/// Web search backend queried once per query variant.
/// Implemented by `DuckDuckGoClient` for production; mock implementations used in tests.
pub trait SearchProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawResult>, SearchError>;
}
