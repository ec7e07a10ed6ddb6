use serde::Deserialize;
use tracing::debug;

use super::client::{GeminiClient, GeminiError, Prompt};
use super::decode::decode_payload;
use crate::query::{QueryFields, SemanticParser};
use crate::search::rank::SemanticRanker;

const PARSE_SYSTEM: &str = r#"You are a search query parser. Extract the person's name and company from user search queries.

Return a JSON object with:
- "name": the person's name (or null if not provided)
- "company": the company name (or null if not provided)

Examples:
- "John Williams Netflix" -> {"name": "John Williams", "company": "Netflix"}
- "Sarah Chen at Stripe" -> {"name": "Sarah Chen", "company": "Stripe"}

Only return the JSON object, nothing else."#;

const RANK_SYSTEM: &str = "You are a profile matching expert. Return only valid JSON.";

const RANK_RULES: &str = r#"IMPORTANT SCORING RULES:
- Names must match EXACTLY (first AND last name). "Jonathan Laguerre" is NOT "Johnathan Laguerre" or "Jonathan Smith".
- If company is specified, person should work there (check title/snippet).

Scoring guide:
- 100 = Perfect match: exact name AND confirmed at target company
- 80 = Strong match: exact name, company appears likely in title/snippet
- 60 = Good match: exact name, company unknown
- 40 = Partial: slight name variation (e.g., "Jon" vs "Jonathan") with company match
- 20 = Weak: only first OR last name matches
- 0 = No match: different person

Return ONLY a JSON array of scores in order, like: [85, 60, 40, ...]"#;

const PARSE_MAX_TOKENS: u32 = 100;
const RANK_MAX_TOKENS: u32 = 200;

#[derive(Deserialize)]
struct ParsedFields {
    name: Option<String>,
    company: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn decode_fields(text: &str) -> Result<QueryFields, GeminiError> {
    let fields: ParsedFields = decode_payload(text, '{', '}')?;
    Ok(QueryFields {
        name: non_blank(fields.name),
        company: non_blank(fields.company),
    })
}

/// Scores may come back as floats; they are truncated toward zero.
pub(crate) fn decode_scores(text: &str) -> Result<Vec<i64>, GeminiError> {
    let scores: Vec<f64> = decode_payload(text, '[', ']')?;
    Ok(scores.into_iter().map(|s| s.trunc() as i64).collect())
}

impl SemanticParser for GeminiClient {
    async fn interpret(&self, raw: &str) -> Result<QueryFields, GeminiError> {
        let text = self
            .generate(&Prompt {
                system: PARSE_SYSTEM,
                user: raw,
                max_output_tokens: PARSE_MAX_TOKENS,
            })
            .await?;
        debug!(chars = text.len(), "semantic parse response");
        decode_fields(&text)
    }
}

impl SemanticRanker for GeminiClient {
    async fn score_candidates(
        &self,
        candidate_lines: &[String],
        target_description: &str,
    ) -> Result<Vec<i64>, GeminiError> {
        let user = format!(
            "Score each LinkedIn profile on how well it matches the target person.\n\n\
             Target: {target_description}\n\nProfiles:\n{}\n\n{RANK_RULES}",
            candidate_lines.join("\n")
        );
        let text = self
            .generate(&Prompt {
                system: RANK_SYSTEM,
                user: &user,
                max_output_tokens: RANK_MAX_TOKENS,
            })
            .await?;
        debug!(chars = text.len(), "semantic ranking response");
        decode_scores(&text)
    }
}
