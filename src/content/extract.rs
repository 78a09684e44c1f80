//! Response salvage for free-text shapes.
//!
//! Generator output for post/comment content is supposed to be
//! `{"content": "..."}` but routinely arrives fenced, truncated, or
//! wrapped in prose. Extraction runs a layered strategy: direct JSON
//! field access, then regex recovery of a quoted value, then heuristic
//! stripping of JSON scaffolding. Whatever survives must still clear a
//! minimum length and a known-truncation blocklist.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

/// Minimum viable length for recovered free text.
pub const MIN_TEXT_LEN: usize = 10;

/// Exact strings produced by mid-word truncation of refusal prefixes.
const TRUNCATION_ARTIFACTS: &[&str] = &["Couldn", "I couldn", "I can't"];

lazy_static! {
    /// `"content": "..."` anywhere in the raw response
    static ref CONTENT_FIELD_RE: Regex =
        Regex::new(r#""content"\s*:\s*"([^"]*)""#).expect("static regex");

    /// A quoted string at the start of the response
    static ref LEADING_QUOTE_RE: Regex = Regex::new(r#"^\s*"([^"]*)""#).expect("static regex");

    /// Leading `{"content": "` scaffolding
    static ref LEADING_SCAFFOLD_RE: Regex =
        Regex::new(r#"^\s*\{\s*"content"\s*:\s*""#).expect("static regex");

    /// Trailing `"}` scaffolding
    static ref TRAILING_SCAFFOLD_RE: Regex = Regex::new(r#""\s*\}\s*$"#).expect("static regex");
}

/// Remove surrounding markdown code-fence markers, if present.
pub fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();
    for prefix in ["```json", "```"] {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest;
            break;
        }
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim().to_string()
}

/// Recover the free-text body from a raw generator response.
///
/// Returns `None` when nothing usable survives, which callers treat as
/// an attempt failure feeding the retry/fallback path.
pub fn extract_free_text(raw: &str) -> Option<String> {
    // Layer 1: well-formed JSON with a content field. Tolerates the
    // nested {"content": {"text": ...}} variant some models emit.
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        let direct = value.get("content").and_then(|c| match c {
            Value::String(s) => Some(s.clone()),
            Value::Object(inner) => inner
                .get("text")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        });
        if let Some(text) = direct {
            return accept(text);
        }
    }

    // Layer 2: quoted value following the content key
    if let Some(caps) = CONTENT_FIELD_RE.captures(raw) {
        if let Some(text) = caps.get(1).map(|m| m.as_str().to_string()) {
            if text.len() > 5 {
                return accept(text);
            }
        }
    }

    // Layer 3: leading quoted string
    if let Some(caps) = LEADING_QUOTE_RE.captures(raw) {
        if let Some(text) = caps.get(1).map(|m| m.as_str().to_string()) {
            if text.len() > 5 {
                return accept(text);
            }
        }
    }

    // Layer 4: strip JSON scaffolding and unescape quotes
    let cleaned = LEADING_SCAFFOLD_RE.replace(raw, "");
    let cleaned = TRAILING_SCAFFOLD_RE.replace(&cleaned, "");
    let cleaned = cleaned.replace("\\\"", "\"");
    accept(cleaned.trim().to_string())
}

fn accept(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.len() < MIN_TEXT_LEN || TRUNCATION_ARTIFACTS.contains(&trimmed) {
        return None;
    }
    Some(trimmed.to_string())
}
