use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::search::provider::SearchError;
use crate::search::types::RawResult;

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css}: {e:?}")))
}

/// Parse the HTML-only results page into raw records, skipping ads.
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<RawResult>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = selector(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )?;
    let title_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let results = document
        .select(&result_sel)
        .filter_map(|element| parse_one(element, &title_sel, &snippet_sel))
        .take(max_results)
        .collect();

    Ok(results)
}

fn parse_one(element: ElementRef<'_>, title_sel: &Selector, snippet_sel: &Selector) -> Option<RawResult> {
    let anchor = element.select(title_sel).next()?;
    let title = collapse_text(anchor);
    if title.is_empty() {
        return None;
    }
    let url = unwrap_redirect(anchor.value().attr("href")?)?;
    let snippet = element
        .select(snippet_sel)
        .next()
        .map(collapse_text)
        .unwrap_or_default();

    Some(RawResult {
        url,
        title,
        snippet,
    })
}

fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve `//duckduckgo.com/l/?uddg=<encoded target>` links to their target.
fn unwrap_redirect(href: &str) -> Option<String> {
    let full = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let parsed = Url::parse(&full).ok()?;

    if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(full)
    }
}
