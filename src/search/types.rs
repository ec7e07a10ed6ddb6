use serde::Serialize;

/// One raw record returned by the search provider for a single variant.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Structured profile guess extracted from one raw search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub name: String,
    pub title: Option<String>,
    pub location: Option<String>,
    pub url: String,
    pub snippet: Option<String>,
    /// 0-100, higher is a better match. Zero until the ranking step runs.
    pub match_score: u8,
}

/// Terminal output of one search call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub profiles: Vec<CandidateProfile>,
    pub query: String,
    pub parsed_name: Option<String>,
    pub parsed_company: Option<String>,
}

impl SearchResult {
    pub fn empty(query: &str, parsed_name: Option<String>, parsed_company: Option<String>) -> Self {
        Self {
            profiles: Vec::new(),
            query: query.to_string(),
            parsed_name,
            parsed_company,
        }
    }
}
