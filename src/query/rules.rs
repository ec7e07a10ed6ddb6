use super::ParsedQuery;

/// Lowercase names that are treated as employers on sight.
const KNOWN_COMPANIES: &[&str] = &[
    "google", "microsoft", "apple", "amazon", "meta", "facebook", "netflix", "oracle", "ibm",
    "intel", "cisco", "salesforce", "adobe", "nvidia", "tesla", "uber", "lyft", "airbnb",
    "spotify", "twitter", "x", "linkedin", "stripe", "square", "shopify", "zoom", "slack",
    "dropbox", "github", "openai", "anthropic", "databricks", "snowflake", "palantir",
    "coinbase",
];

/// Trailing tokens that belong to a person's name rather than an employer.
const NAME_SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "phd", "md", "esq"];

const SEPARATORS: [&str; 3] = [" at ", " from ", " @ "];

fn is_known_company(token: &str) -> bool {
    KNOWN_COMPANIES.contains(&token.to_lowercase().as_str())
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Rule-based classification of a raw query into name and company.
///
/// Returns the interpretation and whether the rules were confident about it.
/// An unconfident result is still the best local guess and is used as-is
/// when no semantic parser is available.
pub fn interpret(raw: &str) -> (ParsedQuery, bool) {
    let query = raw.trim();
    let parsed = |name: Option<String>, company: Option<String>| ParsedQuery {
        name,
        company,
        raw_query: query.to_string(),
    };

    if query.is_empty() {
        return (parsed(None, None), true);
    }

    if let Some((left, right)) = query.split_once(',') {
        return (parsed(non_empty(left), non_empty(right)), true);
    }

    // ASCII lowercasing keeps byte offsets aligned with the original string.
    let lower = query.to_ascii_lowercase();
    for sep in SEPARATORS {
        if let Some(idx) = lower.find(sep) {
            let name = &query[..idx];
            let company = &query[idx + sep.len()..];
            return (parsed(non_empty(name), non_empty(company)), true);
        }
    }

    let words: Vec<&str> = query.split_whitespace().collect();
    match words.as_slice() {
        [word] if is_known_company(word) => (parsed(None, Some(word.to_string())), true),
        [_] => (parsed(Some(query.to_string()), None), true),
        [first, second] if is_known_company(second) => (
            parsed(Some(first.to_string()), Some(second.to_string())),
            true,
        ),
        [_, _] => (parsed(Some(query.to_string()), None), true),
        [rest @ .., last] if is_known_company(last) => {
            (parsed(Some(rest.join(" ")), Some(last.to_string())), true)
        }
        [rest @ .., last] if looks_like_company(last) => {
            (parsed(Some(rest.join(" ")), Some(last.to_string())), false)
        }
        _ => (parsed(Some(query.to_string()), None), false),
    }
}

fn looks_like_company(token: &str) -> bool {
    let capitalized = token.chars().next().is_some_and(char::is_uppercase);
    capitalized && !NAME_SUFFIXES.contains(&token.to_lowercase().as_str())
}
