use std::sync::LazyLock;

use regex::Regex;

use crate::platform::{PROFILE_KEYWORD, SITE_RESTRICT, is_platform_name};
use crate::query::ParsedQuery;

static PLATFORM_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\blinkedin\b").expect("static regex"));

/// Drop a company that only names the platform itself.
pub fn normalize_company(parsed: ParsedQuery) -> ParsedQuery {
    let company = parsed.company.filter(|c| !is_platform_name(c));
    ParsedQuery { company, ..parsed }
}

/// Ordered provider queries for one parsed query, most specific first.
pub fn build_variants(parsed: &ParsedQuery) -> Vec<String> {
    match (parsed.name.as_deref(), parsed.company.as_deref()) {
        (Some(name), Some(company)) => vec![
            format!("\"{name}\" {company} {SITE_RESTRICT}"),
            format!("\"{name}\" {SITE_RESTRICT}"),
        ],
        (Some(name), None) => vec![
            format!("\"{name}\" {SITE_RESTRICT}"),
            format!("{name} {PROFILE_KEYWORD} {SITE_RESTRICT}"),
        ],
        _ => {
            let cleaned = PLATFORM_WORD.replace_all(&parsed.raw_query, "");
            let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
            if cleaned.is_empty() {
                Vec::new()
            } else {
                vec![format!("{cleaned} {SITE_RESTRICT}")]
            }
        }
    }
}
