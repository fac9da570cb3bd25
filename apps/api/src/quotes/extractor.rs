//! Quote extraction: turns free-form completion text into a list of quotes.
//!
//! Strategies run in order and the first one that produces a sequence wins:
//!
//! 1. strict: the whole text is a JSON array
//! 2. embedded: a `[...]` span inside commentary or code fences
//! 3. lines: one quote per line, list markers and wrapping quotes stripped
//!
//! A strict parse that yields an array is final even when every element is
//! blank. Extraction never fails; no usable text gives an empty list.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

type Strategy = fn(&str, usize) -> Option<Vec<String>>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("strict", strict_array),
    ("embedded", embedded_array),
    ("lines", split_lines),
];

/// Extracts at most `count` trimmed, non-empty quotes from `text`, in source order.
pub fn extract_quotes(text: &str, count: usize) -> Vec<String> {
    for (name, strategy) in STRATEGIES {
        if let Some(mut quotes) = strategy(text, count) {
            debug!("Extracted {} quotes via {name} strategy", quotes.len());
            quotes.truncate(count);
            return quotes;
        }
    }
    Vec::new()
}

fn strict_array(text: &str, _count: usize) -> Option<Vec<String>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(clean_items(items)),
        _ => None,
    }
}

fn embedded_array(text: &str, _count: usize) -> Option<Vec<String>> {
    let span = bracket_span().find(text)?;
    let items = serde_json::from_str::<Vec<Value>>(span.as_str()).ok()?;
    Some(clean_items(items)).filter(|quotes| !quotes.is_empty())
}

fn split_lines(text: &str, count: usize) -> Option<Vec<String>> {
    let quotes: Vec<String> = text
        .split('\n')
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .take(count)
        .collect();
    Some(quotes).filter(|quotes| !quotes.is_empty())
}

/// Greedy first-`[` to last-`]` match, spanning newlines.
fn bracket_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("bracket pattern is valid"))
}

/// Leading run of bullet and numbering characters.
fn list_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*\d.)\s]+").expect("list marker pattern is valid"))
}

fn clean_line(line: &str) -> String {
    let unmarked = list_marker().replace(line, "");
    let line: &str = &unmarked;
    let line = line.strip_prefix('"').unwrap_or(line);
    let line = line.strip_suffix('"').unwrap_or(line);
    line.trim().to_string()
}

fn clean_items(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| stringify(item).trim().to_string())
        .filter(|quote| !quote.is_empty())
        .collect()
}

/// Strings pass through as-is; any other JSON value becomes its serde JSON
/// text. This is not JavaScript `String()`: `1.0` stays `"1.0"` and an object
/// renders as `{"a":1}`, not `"[object Object]"`.
fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
