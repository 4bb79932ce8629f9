//! Value normalization — turns any JSON leaf into the comparable string the
//! diff engine sees.
//!
//! HTML from the rich-text editor is reduced to plain text with an ordered
//! list of substitutions. The order is part of the contract: `<li>` must be
//! rewritten before the catch-all tag strip removes it.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// Separator used when an array collapses into one comparable value.
pub const ARRAY_JOINER: &str = " | ";

/// HTML → text substitutions, applied top to bottom.
const HTML_RULES: &[(&str, &str)] = &[
    (r"(?i)<\s*br\s*/?>", "\n"),
    (r"(?i)<\s*/p\s*>", "\n"),
    (r"(?i)<\s*li[^>]*>", "- "),
    (r"(?i)<\s*/li\s*>", "\n"),
    (r"<[^>]+>", ""),
    (r"(?i)&nbsp;", " "),
    (r"\n{3,}", "\n\n"),
];

fn html_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        HTML_RULES
            .iter()
            .map(|(pattern, replacement)| {
                (Regex::new(pattern).expect("static HTML rule"), *replacement)
            })
            .collect()
    })
}

fn html_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("static tag pattern"))
}

fn whitespace_run() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"\s+").expect("static whitespace pattern"))
}

/// Converts editor HTML to plain text. Newlines survive; callers that need
/// a single-line value run [`collapse_whitespace`] afterwards.
pub fn strip_html(value: &str) -> String {
    let text = html_rules()
        .iter()
        .fold(value.to_string(), |text, (rule, replacement)| {
            rule.replace_all(&text, *replacement).into_owned()
        });
    text.trim().to_string()
}

pub fn collapse_whitespace(value: &str) -> String {
    whitespace_run().replace_all(value, " ").trim().to_string()
}

/// Normalizes a string leaf. Markup is stripped first, then every
/// whitespace run (including the newlines the strip introduced) becomes a
/// single space.
pub fn normalize_text(value: &str) -> String {
    if html_tag().is_match(value) {
        collapse_whitespace(&strip_html(value))
    } else {
        collapse_whitespace(value)
    }
}

/// Comparable form of any JSON value. Empty string means "no content".
pub fn to_comparable_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => normalize_text(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::Array(items) => items
            .iter()
            .map(to_comparable_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(ARRAY_JOINER),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Integers print bare; integral floats print without a trailing `.0`.
fn number_to_string(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
}
