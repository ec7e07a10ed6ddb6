use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::extract::{extract_profile, profile_from_url};
use super::provider::{SearchError, SearchProvider};
use super::rank::{SemanticRanker, Target, rank};
use super::types::{RawResult, SearchResult};
use super::variants::{build_variants, normalize_company};
use crate::query::{ParsedQuery, SemanticParser, parse_query};

/// Upper bound on a single provider call, including the HTTP round-trip.
const VARIANT_TIMEOUT: Duration = Duration::from_secs(15);

/// Finds and ranks candidate profiles for a loose name/company query.
///
/// Semantic collaborators are optional: `None` means the capability is not
/// configured, and the rule-based parser and keyword ranking are used instead.
/// Holds no per-call state, so one instance can serve concurrent searches.
pub struct ProfileSearch<S, P, R> {
    provider: S,
    parser: Option<P>,
    ranker: Option<R>,
}

impl<S, P, R> ProfileSearch<S, P, R>
where
    S: SearchProvider,
    P: SemanticParser,
    R: SemanticRanker,
{
    pub fn new(provider: S, parser: Option<P>, ranker: Option<R>) -> Self {
        Self {
            provider,
            parser,
            ranker,
        }
    }

    /// Interpret a raw query the same way `search` does, without searching.
    pub async fn interpret(&self, query: &str) -> ParsedQuery {
        normalize_company(parse_query(query, self.parser.as_ref()).await)
    }

    /// Run the full pipeline. Every collaborator failure is absorbed, so the
    /// worst case is a well-formed result with no profiles.
    pub async fn search(&self, query: &str, max_results: usize) -> SearchResult {
        if let Some(profile) = profile_from_url(query) {
            info!(url = %profile.url, "direct profile reference");
            return SearchResult {
                query: query.to_string(),
                parsed_name: Some(profile.name.clone()),
                parsed_company: None,
                profiles: vec![profile],
            };
        }

        let parsed = self.interpret(query).await;
        let variants = build_variants(&parsed);
        debug!(variants = variants.len(), "query variants built");

        let raw = gather(&self.provider, &variants, max_results).await;
        if raw.is_empty() {
            return SearchResult::empty(query, parsed.name, parsed.company);
        }

        let extraction_cap = max_results.saturating_mul(2);
        let candidates: Vec<_> = raw
            .iter()
            .filter_map(extract_profile)
            .take(extraction_cap)
            .collect();
        debug!(raw = raw.len(), candidates = candidates.len(), "profiles extracted");

        let target = Target {
            name: parsed.name.as_deref(),
            company: parsed.company.as_deref(),
        };
        let ranked = rank(candidates, target, self.ranker.as_ref()).await;
        debug!(scoring = ?ranked.state, "candidates ranked");
        let mut profiles = ranked.profiles;
        profiles.truncate(max_results);

        SearchResult {
            profiles,
            query: query.to_string(),
            parsed_name: parsed.name,
            parsed_company: parsed.company,
        }
    }
}

/// Query variants in order, keeping the first occurrence of each URL.
/// Stops once twice the requested count has been collected.
async fn gather(
    provider: &impl SearchProvider,
    variants: &[String],
    max_results: usize,
) -> Vec<RawResult> {
    let target = max_results.saturating_mul(2);
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for variant in variants {
        let outcome = tokio::time::timeout(VARIANT_TIMEOUT, provider.search(variant, max_results))
            .await
            .unwrap_or_else(|_| Err(SearchError::Timeout(VARIANT_TIMEOUT.as_secs())));

        match outcome {
            Ok(batch) => {
                let before = results.len();
                for result in batch {
                    if !result.url.is_empty() && seen.insert(result.url.clone()) {
                        results.push(result);
                    }
                }
                debug!(variant = %variant, added = results.len() - before, "variant searched");
            }
            Err(e) => {
                warn!(variant = %variant, error = %e, "search variant failed (continuing)");
                continue;
            }
        }

        if results.len() >= target {
            break;
        }
    }

    results
}
