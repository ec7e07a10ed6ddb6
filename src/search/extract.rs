//! Heuristic conversion of raw search records into candidate profiles.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use super::types::{CandidateProfile, RawResult};
use crate::platform::{
    self, DIRECT_URL_SNIPPET, PLACEHOLDER_NAME, PROFILE_PATH, is_platform_name, is_profile_url,
};

const MAX_LOCATION_CHARS: usize = 50;
const MAX_SNIPPET_CHARS: usize = 200;

/// Tried in order against the snippet; first match wins.
static LOCATION_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)Location:\s*([^·•\n]+)").expect("static regex"),
        Regex::new(r"(?i)(?:based in|located in|from)\s+([^·•\n.]+)").expect("static regex"),
    ]
});

static PROFILE_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"linkedin\.com/in/([^/?#\s]+)").expect("static regex"));

/// Convert one raw record into a candidate, or `None` when it is not a profile page.
pub fn extract_profile(raw: &RawResult) -> Option<CandidateProfile> {
    if !is_profile_url(&raw.url) {
        return None;
    }

    let (name, title) = split_title(&raw.title);

    Some(CandidateProfile {
        name,
        title,
        location: extract_location(&raw.snippet),
        url: raw.url.clone(),
        snippet: (!raw.snippet.is_empty()).then(|| truncate_chars(&raw.snippet, MAX_SNIPPET_CHARS)),
        match_score: 0,
    })
}

/// Split "Name - Title | LinkedIn" or "Name | LinkedIn" into name and job title.
fn split_title(page_title: &str) -> (String, Option<String>) {
    let mut name = page_title;
    let mut title = None;

    if let Some((left, right)) = page_title.split_once(" - ") {
        name = left.trim();
        let job = platform::strip_title_suffix(right);
        if !job.is_empty() && !is_platform_name(&job) {
            title = Some(job);
        }
    } else if let Some((left, _)) = page_title.split_once(" | ") {
        name = left.trim();
    }

    let name = platform::strip_title_suffix(name);
    if name.is_empty() || is_platform_name(&name) {
        return (PLACEHOLDER_NAME.to_string(), title);
    }
    (name, title)
}

fn extract_location(snippet: &str) -> Option<String> {
    LOCATION_PATTERNS.iter().find_map(|pattern| {
        let found = pattern.captures(snippet)?.get(1)?.as_str().trim();
        Some(truncate_chars(found, MAX_LOCATION_CHARS))
    })
}

/// Build a candidate from a profile URL alone, naming it after the URL slug.
/// Returns `None` when the input holds no profile slug.
pub fn profile_from_url(input: &str) -> Option<CandidateProfile> {
    let input = input.trim();
    if !input.contains(PROFILE_PATH) {
        return None;
    }
    let slug = PROFILE_SLUG.captures(input)?.get(1)?.as_str();
    let decoded = percent_decode_str(slug).decode_utf8_lossy();

    let name = name_from_slug(&decoded);
    let url = if input.starts_with("http") {
        input.to_string()
    } else {
        format!("https://www.{PROFILE_PATH}{slug}")
    };

    Some(CandidateProfile {
        name,
        title: None,
        location: None,
        url,
        snippet: Some(DIRECT_URL_SNIPPET.to_string()),
        match_score: 100,
    })
}

/// "jonathan-n-laguerre-4a1b2c3d" -> "Jonathan N Laguerre"
fn name_from_slug(slug: &str) -> String {
    let name = slug
        .split('-')
        .filter(|part| !part.is_empty() && !is_opaque_id(part))
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        name
    }
}

fn is_opaque_id(part: &str) -> bool {
    part.chars().count() > 6
        && part.chars().all(char::is_alphanumeric)
        && part.chars().any(|c| c.is_ascii_digit())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(url: &str, title: &str, snippet: &str) -> RawResult {
        RawResult {
            url: url.into(),
            title: title.into(),
            snippet: snippet.into(),
        }
    }

    const JANE_URL: &str = "https://www.linkedin.com/in/jane-doe";

    #[test]
    fn discards_non_profile_urls() {
        assert!(extract_profile(&raw("https://www.linkedin.com/company/acme", "Acme", "")).is_none());
        assert!(extract_profile(&raw("https://example.com/jane", "Jane Doe", "")).is_none());
    }

    #[test]
    fn splits_name_and_title() {
        let p = extract_profile(&raw(JANE_URL, "Jane Doe - Software Engineer | LinkedIn", ""))
            .unwrap();
        assert_eq!(p.name, "Jane Doe");
        assert_eq!(p.title.as_deref(), Some("Software Engineer"));
        assert_eq!(p.url, JANE_URL);
        assert_eq!(p.match_score, 0);
    }

    #[test]
    fn title_only_platform_name_is_dropped() {
        let p = extract_profile(&raw(JANE_URL, "Jane Doe - LinkedIn", "")).unwrap();
        assert_eq!(p.name, "Jane Doe");
        assert!(p.title.is_none());
    }

    #[test]
    fn pipe_separator_gives_name_only() {
        let p = extract_profile(&raw(JANE_URL, "Jane Doe | LinkedIn", "")).unwrap();
        assert_eq!(p.name, "Jane Doe");
        assert!(p.title.is_none());
    }

    #[test]
    fn keeps_extra_dashes_in_title() {
        let p = extract_profile(&raw(JANE_URL, "Jane Doe - CTO - Acme | LinkedIn", "")).unwrap();
        assert_eq!(p.name, "Jane Doe");
        assert_eq!(p.title.as_deref(), Some("CTO - Acme"));
    }

    #[test]
    fn placeholder_for_missing_or_platform_name() {
        let p = extract_profile(&raw(JANE_URL, "LinkedIn", "")).unwrap();
        assert_eq!(p.name, PLACEHOLDER_NAME);

        let p = extract_profile(&raw(JANE_URL, "", "")).unwrap();
        assert_eq!(p.name, PLACEHOLDER_NAME);

        let p = extract_profile(&raw(JANE_URL, " - Engineer | LinkedIn", "")).unwrap();
        assert_eq!(p.name, PLACEHOLDER_NAME);
        assert_eq!(p.title.as_deref(), Some("Engineer"));
    }

    #[test]
    fn location_label_wins_over_phrase() {
        let p = extract_profile(&raw(
            JANE_URL,
            "Jane Doe | LinkedIn",
            "Engineer from Boston. Location: San Francisco Bay Area · 500+ connections",
        ))
        .unwrap();
        assert_eq!(p.location.as_deref(), Some("San Francisco Bay Area"));
    }

    #[test]
    fn location_from_phrase() {
        let p = extract_profile(&raw(
            JANE_URL,
            "Jane Doe | LinkedIn",
            "Product designer based in Berlin, Germany. Loves maps.",
        ))
        .unwrap();
        assert_eq!(p.location.as_deref(), Some("Berlin, Germany"));
    }

    #[test]
    fn location_is_capped_at_50_chars() {
        let long_place = "A".repeat(80);
        let p = extract_profile(&raw(
            JANE_URL,
            "Jane Doe | LinkedIn",
            &format!("Location: {long_place}"),
        ))
        .unwrap();
        assert_eq!(p.location.unwrap().chars().count(), 50);
    }

    #[test]
    fn no_location_when_no_pattern_matches() {
        let p = extract_profile(&raw(JANE_URL, "Jane Doe | LinkedIn", "Builds compilers.")).unwrap();
        assert!(p.location.is_none());
    }

    #[test]
    fn snippet_truncated_and_empty_is_none() {
        let long = "é".repeat(300);
        let p = extract_profile(&raw(JANE_URL, "Jane Doe", &long)).unwrap();
        assert_eq!(p.snippet.unwrap().chars().count(), 200);

        let p = extract_profile(&raw(JANE_URL, "Jane Doe", "")).unwrap();
        assert!(p.snippet.is_none());
    }

    #[test]
    fn url_mode_names_from_slug_and_drops_id_suffix() {
        let p = profile_from_url("https://www.linkedin.com/in/jonathan-n-laguerre-4a1b2c3d/").unwrap();
        assert_eq!(p.name, "Jonathan N Laguerre");
        assert_eq!(p.match_score, 100);
        assert_eq!(p.url, "https://www.linkedin.com/in/jonathan-n-laguerre-4a1b2c3d/");
        assert_eq!(p.snippet.as_deref(), Some(DIRECT_URL_SNIPPET));
    }

    #[test]
    fn url_mode_canonicalizes_bare_reference() {
        let p = profile_from_url("linkedin.com/in/jane-doe?trk=abc").unwrap();
        assert_eq!(p.name, "Jane Doe");
        assert_eq!(p.url, "https://www.linkedin.com/in/jane-doe");
    }

    #[test]
    fn url_mode_keeps_short_tokens_with_digits() {
        let p = profile_from_url("https://linkedin.com/in/jane-doe2").unwrap();
        assert_eq!(p.name, "Jane Doe2");
    }

    #[test]
    fn url_mode_decodes_percent_escapes() {
        let p = profile_from_url("https://www.linkedin.com/in/jos%C3%A9-garc%C3%ADa").unwrap();
        assert_eq!(p.name, "José García");
    }

    #[test]
    fn url_mode_placeholder_when_slug_is_only_ids() {
        let p = profile_from_url("https://www.linkedin.com/in/a1b2c3d4e5").unwrap();
        assert_eq!(p.name, PLACEHOLDER_NAME);
    }

    #[test]
    fn url_mode_rejects_non_profile_input() {
        assert!(profile_from_url("Jane Doe").is_none());
        assert!(profile_from_url("https://www.linkedin.com/in/").is_none());
    }
}
