use std::fmt::Write;

use crate::search::SearchResult;

/// Escape characters that break Markdown link syntax: `[`, `]`, `(`, `)`.
pub(crate) fn escape_md_link(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '[' | ']' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Replace newlines so user input cannot break heading structure.
fn single_line(s: &str) -> String {
    s.replace(['\n', '\r'], " ")
}

pub fn format_results(result: &SearchResult) -> String {
    let mut output = format!("# Profiles: {}\n\n", single_line(&result.query));

    let interpretation = match (&result.parsed_name, &result.parsed_company) {
        (Some(name), Some(company)) => Some(format!("{name} @ {company}")),
        (Some(name), None) => Some(name.clone()),
        (None, Some(company)) => Some(format!("anyone @ {company}")),
        (None, None) => None,
    };
    if let Some(text) = interpretation {
        let _ = writeln!(output, "_Interpreted as: {}_\n", single_line(&text));
    }

    if result.profiles.is_empty() {
        output.push_str("No matching profiles found.\n");
        return output;
    }

    for (i, profile) in result.profiles.iter().enumerate() {
        let _ = writeln!(
            output,
            "{}. [{}]({}) ({})",
            i + 1,
            escape_md_link(&profile.name),
            escape_md_link(&profile.url),
            profile.match_score
        );
        if let Some(title) = &profile.title {
            let _ = writeln!(output, "   - {title}");
        }
        if let Some(location) = &profile.location {
            let _ = writeln!(output, "   - Location: {location}");
        }
    }

    output
}
