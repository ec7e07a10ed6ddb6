//! LinkedIn-specific constants shared by query building and extraction.

pub const PROFILE_PATH: &str = "linkedin.com/in/";
pub const SITE_RESTRICT: &str = "site:linkedin.com/in";
pub const PROFILE_KEYWORD: &str = "linkedin profile";
pub const PLACEHOLDER_NAME: &str = "LinkedIn Member";
pub const DIRECT_URL_SNIPPET: &str = "Direct URL - profile details available on LinkedIn";

/// Title suffixes the platform appends to page titles.
const TITLE_SUFFIXES: [&str; 2] = [" | LinkedIn", "| LinkedIn"];

/// Company values that only name the platform itself.
const PLATFORM_ALIASES: [&str; 2] = ["linkedin", "linked in"];

pub fn is_profile_url(url: &str) -> bool {
    url.contains(PROFILE_PATH)
}

pub fn is_platform_name(s: &str) -> bool {
    let lower = s.to_lowercase();
    PLATFORM_ALIASES.contains(&lower.as_str())
}

pub fn strip_title_suffix(s: &str) -> String {
    TITLE_SUFFIXES
        .iter()
        .fold(s.to_string(), |acc, suffix| acc.replace(suffix, ""))
        .trim()
        .to_string()
}
