use std::time::Duration;

use clap::{Subcommand, ValueEnum};
use reqwest::Client;
use tracing::{info, warn};

use crate::duckduckgo::DuckDuckGoClient;
use crate::gemini::client::GeminiClient;
use crate::markdown::format_results;
use crate::search::ProfileSearch;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum redirect hops before aborting.
const MAX_REDIRECTS: usize = 5;
const MAX_RESULTS_LIMIT: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("could not build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Format {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find and rank LinkedIn profiles for a name/company query or a profile URL
    Search {
        /// e.g. "John Smith, Oracle", "Sarah at Google", or a linkedin.com/in/ URL
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Number of profiles to return (1-50)
        #[arg(short = 'n', long, default_value_t = 10)]
        max_results: usize,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Markdown)]
        format: Format,
    },
    /// Show how a query is interpreted as name and company
    Parse {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

/// Wires the production collaborators into the search engine.
///
/// Configuration via environment variables:
/// - `GEMINI_API_KEY`: enables semantic parsing and ranking (optional)
/// - `GEMINI_MODEL`: overrides the default model (optional)
pub struct Scout {
    engine: ProfileSearch<DuckDuckGoClient, GeminiClient, GeminiClient>,
}

impl Scout {
    pub fn new(semantic: bool) -> Result<Self, CliError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        let gemini = if semantic {
            GeminiClient::from_env(http.clone())
                .inspect_err(|e| warn!("semantic parsing and ranking unavailable: {e}"))
                .ok()
        } else {
            info!("semantic parsing and ranking disabled");
            None
        };
        let provider = DuckDuckGoClient::new(http);
        Ok(Self {
            engine: ProfileSearch::new(provider, gemini.clone(), gemini),
        })
    }

    pub async fn run(&self, command: Command) -> Result<String, CliError> {
        match command {
            Command::Search {
                query,
                max_results,
                format,
            } => self.search(&join_query(&query)?, max_results, format).await,
            Command::Parse { query } => self.parse(&join_query(&query)?).await,
        }
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        format: Format,
    ) -> Result<String, CliError> {
        let max_results = max_results.clamp(1, MAX_RESULTS_LIMIT);
        info!(query = %query, max_results, "command:search");

        let result = self.engine.search(query, max_results).await;
        info!(profiles = result.profiles.len(), "search complete");

        match format {
            Format::Markdown => Ok(format_results(&result)),
            Format::Json => Ok(serde_json::to_string_pretty(&result)?),
        }
    }

    async fn parse(&self, query: &str) -> Result<String, CliError> {
        info!(query = %query, "command:parse");
        let parsed = self.engine.interpret(query).await;
        Ok(serde_json::to_string_pretty(&parsed)?)
    }
}

fn join_query(words: &[String]) -> Result<String, CliError> {
    let query = words.join(" ");
    if query.trim().is_empty() {
        return Err(CliError::EmptyQuery);
    }
    Ok(query)
}
