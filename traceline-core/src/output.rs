//! Parsing of semi-structured model output
//!
//! Completion models asked for strict JSON return it wrapped in fences,
//! prose, comments, or with unquoted keys often enough that every protocol
//! shares this lenient pipeline: extract a fenced block if present, try a
//! strict parse, retry once after repairs, then try the outermost bracketed
//! slice of the text. What could not be recovered stays available to the
//! caller as raw text.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::align::LineRange;

/// Field both alignment protocols may wrap their payload in
pub const RELATED_LINES: &str = "related_lines";

/// Parsed model output, tagged by what was recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutput {
    /// Well-formed `[start, end]` line intervals
    Intervals(Vec<LineRange>),
    /// A flat list of line numbers
    Lines(Vec<u32>),
    /// Nothing structured could be recovered; carries the raw text
    Unparsed(String),
}

/// Parse model output for the interval protocol
///
/// Returns `Intervals` only when every member of the recovered list is a
/// well-formed two-element integer pair; anything else is `Unparsed`. The
/// digit fallback never applies here, since a flat digit list cannot be
/// reinterpreted as pairs.
pub fn parse_intervals(raw: &str) -> ModelOutput {
    let Some(Value::Array(items)) = parse_payload(raw, RELATED_LINES) else {
        return ModelOutput::Unparsed(raw.to_string());
    };
    let mut ranges = Vec::with_capacity(items.len());
    for item in &items {
        match as_pair(item) {
            Some(range) => ranges.push(range),
            None => return ModelOutput::Unparsed(raw.to_string()),
        }
    }
    ModelOutput::Intervals(ranges)
}

/// Parse model output for the line-number protocol
///
/// Falls back to extracting every run of digits in the raw text when no
/// structured list of integers can be recovered, so this never returns
/// `Unparsed`.
pub fn parse_lines(raw: &str) -> ModelOutput {
    if let Some(Value::Array(items)) = parse_payload(raw, RELATED_LINES) {
        if let Some(lines) = items.iter().map(as_line).collect() {
            return ModelOutput::Lines(lines);
        }
    }
    debug!("No structured line list, falling back to digit extraction");
    ModelOutput::Lines(digit_runs(raw))
}

/// Recover the JSON payload of a response
///
/// Returns the value under `field` when the parse yields an object, the
/// value itself when it yields a bare array, `None` otherwise.
pub fn parse_payload(raw: &str, field: &str) -> Option<Value> {
    let candidate = extract_fenced(raw);
    let value = parse_lenient(candidate)
        .or_else(|| embedded_payload(candidate).and_then(parse_lenient))?;
    match value {
        Value::Object(mut map) => map.remove(field),
        list @ Value::Array(_) => Some(list),
        _ => None,
    }
}

/// Strict parse, retried once with bare keys quoted and comments stripped
fn parse_lenient(text: &str) -> Option<Value> {
    serde_json::from_str(text)
        .or_else(|_| serde_json::from_str(&repair(text)))
        .ok()
}

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.+?)```").expect("fence regex compiles"))
}

fn bare_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w+)\s*:").expect("bare key regex compiles"))
}

fn comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"//.*").expect("comment regex compiles"))
}

fn digit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("digit regex compiles"))
}

/// Inner text of the first fenced code block, or the raw text
fn extract_fenced(raw: &str) -> &str {
    fence_regex()
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map_or(raw, |m| m.as_str())
        .trim()
}

/// Slice from the first opening bracket to the last matching closer
///
/// Lets a payload embedded in surrounding prose ("Based on analysis:
/// [[10, 12]]") reach the strict parser.
fn embedded_payload(text: &str) -> Option<&str> {
    let open = text.find(|c| c == '[' || c == '{')?;
    let closer = if text.as_bytes()[open] == b'[' { ']' } else { '}' };
    let close = text.rfind(closer)?;
    (close > open).then(|| &text[open..=close])
}

/// Quote bare object keys and strip `//` comments
fn repair(text: &str) -> String {
    let quoted = bare_key_regex().replace_all(text, "\"${1}\":");
    comment_regex().replace_all(&quoted, "").into_owned()
}

fn as_pair(value: &Value) -> Option<LineRange> {
    let Value::Array(pair) = value else {
        return None;
    };
    if pair.len() != 2 {
        return None;
    }
    Some(LineRange::new(as_line(&pair[0])?, as_line(&pair[1])?))
}

fn as_line(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn digit_runs(raw: &str) -> Vec<u32> {
    digit_regex()
        .find_iter(raw)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}
