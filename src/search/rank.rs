//! Candidate ranking: semantic scoring when available, keyword scoring otherwise.

use std::cmp::Reverse;

use tracing::{debug, warn};

use super::types::CandidateProfile;
use crate::gemini::client::GeminiError;

/// Candidates beyond this index are never sent for semantic scoring.
pub const SEMANTIC_BATCH_LIMIT: usize = 15;

const BASE_SCORE: u32 = 50;
const NAME_TOKEN_BONUS: u32 = 15;
const COMPANY_BONUS: u32 = 25;
const MAX_SCORE: u32 = 100;

/// Batch relevance scoring of candidate descriptions against a target.
/// Implemented by `GeminiClient` for production; mock implementations used in tests.
pub trait SemanticRanker {
    async fn score_candidates(
        &self,
        candidate_lines: &[String],
        target_description: &str,
    ) -> Result<Vec<i64>, GeminiError>;
}

/// Who the caller is looking for.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target<'a> {
    pub name: Option<&'a str>,
    pub company: Option<&'a str>,
}

impl Target<'_> {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.company.is_none()
    }

    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = self.name {
            parts.push(format!("Name: {name}"));
        }
        if let Some(company) = self.company {
            parts.push(format!("Company: {company}"));
        }
        parts.join(", ")
    }
}

/// Progress of the semantic scoring attempt for one ranking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringState {
    NotAttempted,
    InFlight,
    Succeeded,
    FailedFallback,
}

#[derive(Debug)]
pub struct Ranked {
    pub profiles: Vec<CandidateProfile>,
    pub state: ScoringState,
}

/// Score and order candidates. Returns a new, stably sorted sequence.
///
/// With no target or no candidates the input comes back unchanged. A failed
/// semantic attempt discards any partial result and keyword-scores the whole set.
pub async fn rank<R: SemanticRanker>(
    candidates: Vec<CandidateProfile>,
    target: Target<'_>,
    semantic: Option<&R>,
) -> Ranked {
    if candidates.is_empty() || target.is_empty() {
        return Ranked {
            profiles: candidates,
            state: ScoringState::NotAttempted,
        };
    }

    let Some(ranker) = semantic else {
        let scores = basic_scores(&candidates, target);
        return Ranked {
            profiles: apply_scores(candidates, &scores),
            state: ScoringState::NotAttempted,
        };
    };

    let mut state = ScoringState::InFlight;
    debug!(?state, candidates = candidates.len(), "semantic scoring");

    let scores = match semantic_scores(ranker, &candidates, target).await {
        Ok(scores) => {
            state = ScoringState::Succeeded;
            scores
        }
        Err(e) => {
            warn!(error = %e, "semantic ranking failed, using keyword ranking");
            state = ScoringState::FailedFallback;
            basic_scores(&candidates, target)
        }
    };

    debug!(?state, "ranking complete");
    Ranked {
        profiles: apply_scores(candidates, &scores),
        state,
    }
}

async fn semantic_scores<R: SemanticRanker>(
    ranker: &R,
    candidates: &[CandidateProfile],
    target: Target<'_>,
) -> Result<Vec<u8>, GeminiError> {
    let lines: Vec<String> = candidates
        .iter()
        .take(SEMANTIC_BATCH_LIMIT)
        .enumerate()
        .map(|(i, p)| candidate_line(i, p))
        .collect();

    let returned = ranker
        .score_candidates(&lines, &target.describe())
        .await?;
    if returned.is_empty() {
        return Err(GeminiError::Decode("empty score array".into()));
    }

    let mut scores: Vec<u8> = candidates.iter().map(|p| p.match_score).collect();
    for (slot, score) in scores.iter_mut().zip(returned) {
        *slot = score.clamp(0, MAX_SCORE as i64) as u8;
    }
    Ok(scores)
}

fn candidate_line(index: usize, p: &CandidateProfile) -> String {
    format!(
        "{}. Name: {}, Title: {}, Snippet: {}",
        index + 1,
        p.name,
        p.title.as_deref().unwrap_or("Unknown"),
        p.snippet.as_deref().unwrap_or("None"),
    )
}

/// Keyword score: base 50, +15 per target-name token found inside the
/// candidate name, +25 when the company appears anywhere in the candidate text.
pub fn basic_score(p: &CandidateProfile, target: Target<'_>) -> u8 {
    let mut score = BASE_SCORE;

    if let Some(name) = target.name {
        let candidate_name = p.name.to_lowercase();
        for token in name.to_lowercase().split_whitespace() {
            if candidate_name.contains(token) {
                score += NAME_TOKEN_BONUS;
            }
        }
    }

    if let Some(company) = target.company {
        let text = format!(
            "{} {} {}",
            p.name,
            p.title.as_deref().unwrap_or(""),
            p.snippet.as_deref().unwrap_or("")
        )
        .to_lowercase();
        if text.contains(&company.to_lowercase()) {
            score += COMPANY_BONUS;
        }
    }

    score.min(MAX_SCORE) as u8
}

fn basic_scores(candidates: &[CandidateProfile], target: Target<'_>) -> Vec<u8> {
    candidates.iter().map(|p| basic_score(p, target)).collect()
}

fn apply_scores(candidates: Vec<CandidateProfile>, scores: &[u8]) -> Vec<CandidateProfile> {
    let mut ranked: Vec<CandidateProfile> = candidates
        .into_iter()
        .zip(scores)
        .map(|(p, &match_score)| CandidateProfile { match_score, ..p })
        .collect();
    // sort_by_key is stable: equal scores keep extraction order.
    ranked.sort_by_key(|p| Reverse(p.match_score));
    ranked
}
