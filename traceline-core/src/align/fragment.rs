//! Code fragments and chunk slicing

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chunk::{parse_numbered, CodeChunk};

use super::intervals::LineRange;

/// Review verdict for one fragment against one requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

/// A contiguous slice of a source file judged relevant to a requirement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeFragment {
    /// Source file the fragment came from
    pub filename: String,
    /// Exact slice of the source, numbering stripped
    pub content: String,
    /// First line of the slice, 1-based inclusive
    pub start_line: u32,
    /// Last line of the slice, 1-based inclusive
    pub end_line: u32,
    /// Review verdict, absent until reviewed or when review failed
    #[serde(default)]
    pub review: Option<Verdict>,
    /// Review rationale or failure text
    #[serde(default)]
    pub review_opinion: String,
}

/// Slice a chunk to the lines covered by `range`
///
/// Walks the chunk's numbered lines, keeps those whose embedded number
/// falls inside the range, and strips the numeric prefix exactly. The
/// fragment is clamped to the lines actually present; a range matching
/// nothing yields `None`. A numbered line whose prefix fails to re-parse
/// is a contract violation: it is logged and skipped, never passed
/// through corrupted.
pub fn slice_fragment(chunk: &CodeChunk, range: LineRange) -> Option<CodeFragment> {
    let mut lines: Vec<&str> = Vec::new();
    let mut bounds: Option<(u32, u32)> = None;

    for numbered in chunk.content.lines() {
        let Some((number, content)) = parse_numbered(numbered) else {
            warn!(
                file = %chunk.filename,
                line = %numbered,
                "Chunk line has no parseable number prefix, skipping"
            );
            continue;
        };
        if number < range.start || number > range.end {
            continue;
        }
        lines.push(content);
        bounds = match bounds {
            Some((first, _)) => Some((first, number)),
            None => Some((number, number)),
        };
    }

    let Some((start_line, end_line)) = bounds else {
        debug!(
            file = %chunk.filename,
            start = range.start,
            end = range.end,
            "Range matches no line in chunk, dropping"
        );
        return None;
    };

    Some(CodeFragment {
        filename: chunk.filename.clone(),
        content: lines.join("\n"),
        start_line,
        end_line,
        review: None,
        review_opinion: String::new(),
    })
}
