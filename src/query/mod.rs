//! Query interpretation: fast rules first, semantic parsing only for ambiguous input.

pub(crate) mod rules;

use serde::Serialize;
use tracing::{debug, warn};

use crate::gemini::client::GeminiError;

/// Name/company interpretation of a raw search string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedQuery {
    pub name: Option<String>,
    pub company: Option<String>,
    pub raw_query: String,
}

/// Best-effort fields returned by a semantic parser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFields {
    pub name: Option<String>,
    pub company: Option<String>,
}

/// Language-understanding fallback for queries the rules cannot classify.
/// Implemented by `GeminiClient` for production; mock implementations used in tests.
pub trait SemanticParser {
    async fn interpret(&self, raw: &str) -> Result<QueryFields, GeminiError>;
}

/// Hybrid parse: rule result when confident, otherwise the semantic parser's
/// answer if one is configured and succeeds. Never fails.
pub async fn parse_query<P: SemanticParser>(raw: &str, semantic: Option<&P>) -> ParsedQuery {
    let (parsed, confident) = rules::interpret(raw);
    if confident {
        debug!(name = ?parsed.name, company = ?parsed.company, "rule-based parse");
        return parsed;
    }

    let Some(parser) = semantic else {
        debug!("ambiguous query, no semantic parser configured");
        return parsed;
    };

    match parser.interpret(&parsed.raw_query).await {
        Ok(fields) => {
            debug!(name = ?fields.name, company = ?fields.company, "semantic parse");
            ParsedQuery {
                name: fields.name,
                company: fields.company,
                raw_query: parsed.raw_query,
            }
        }
        Err(e) => {
            warn!(error = %e, "semantic parse failed, keeping rule-based guess");
            parsed
        }
    }
}
