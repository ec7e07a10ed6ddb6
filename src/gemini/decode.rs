//! Defensive decoding of free-text model output into structured values.

use serde::de::DeserializeOwned;

use super::client::GeminiError;

/// Strip a Markdown code fence (and a leading `json` tag) around the payload.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    if !text.contains("```") {
        return text;
    }
    let inner = text.split("```").nth(1).unwrap_or(text);
    inner.strip_prefix("json").unwrap_or(inner).trim()
}

/// Slice from the first `open` to the last `close` delimiter, inclusive.
pub fn locate(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Strip fences, locate the delimited payload, and deserialize it.
pub fn decode_payload<T: DeserializeOwned>(
    text: &str,
    open: char,
    close: char,
) -> Result<T, GeminiError> {
    let body = strip_fences(text);
    let payload = locate(body, open, close)
        .ok_or_else(|| GeminiError::Decode(format!("no {open}...{close} payload in response")))?;
    serde_json::from_str(payload).map_err(|e| GeminiError::Decode(e.to_string()))
}
