//! Range extraction: one completion per (requirement unit, code chunk) pair
//!
//! Chunks are processed strictly in sequence, one in-flight completion at a
//! time. A chunk whose response yields nothing structured contributes zero
//! fragments; a response whose recovered list is structurally malformed
//! empties the whole requirement's result. Endpoint failures propagate and
//! abort the alignment run for the requirement.

use serde_json::Value;
use tracing::{debug, warn};
use traceline_llm::{ChatApi, ChatRequest};

use crate::chunk::CodeChunk;
use crate::error::Result;
use crate::output::{parse_intervals, parse_lines, parse_payload, ModelOutput, RELATED_LINES};
use crate::prompt::{self, Lang, PromptContext, PromptKind};
use crate::requirement::RequirementUnit;

use super::fragment::{slice_fragment, CodeFragment};
use super::intervals::{merge_ranges, runs_from_lines, LineRange};

/// Wire protocol used for relevance matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchProtocol {
    /// The model returns `[[start, end], ...]` intervals
    #[default]
    Intervals,
    /// The model returns `{"related_lines": [...]}` line numbers
    Lines,
}

/// Locates the code regions implementing one requirement unit
pub struct RangeExtractor<'a> {
    api: &'a dyn ChatApi,
    model: &'a str,
    lang: Lang,
    protocol: MatchProtocol,
}

impl<'a> RangeExtractor<'a> {
    /// Create an extractor over the given completion backend
    pub fn new(api: &'a dyn ChatApi, model: &'a str, lang: Lang, protocol: MatchProtocol) -> Self {
        Self {
            api,
            model,
            lang,
            protocol,
        }
    }

    /// Extract the code fragments related to `unit` from `chunks`
    ///
    /// Returns one fragment per merged line range, in chunk order. A
    /// structurally malformed interval list drops every fragment gathered
    /// so far and ends the call with an empty result.
    pub async fn extract_related(
        &self,
        unit: &RequirementUnit,
        chunks: &[CodeChunk],
    ) -> Result<Vec<CodeFragment>> {
        let mut fragments = Vec::new();
        for chunk in chunks {
            let prompt = self.build_prompt(unit, chunk);
            let request = ChatRequest::new(self.model, prompt);
            let raw = self.api.complete(&request).await?;

            let Some(ranges) = self.parse_response(&raw) else {
                warn!(
                    unit = %unit.id,
                    file = %chunk.filename,
                    "Malformed interval list, emptying the requirement's result"
                );
                return Ok(Vec::new());
            };
            debug!(
                unit = %unit.id,
                file = %chunk.filename,
                ranges = ranges.len(),
                "Parsed related ranges"
            );
            for range in ranges {
                if let Some(fragment) = slice_fragment(chunk, range) {
                    fragments.push(fragment);
                }
            }
        }
        Ok(fragments)
    }

    fn build_prompt(&self, unit: &RequirementUnit, chunk: &CodeChunk) -> String {
        let kind = match self.protocol {
            MatchProtocol::Intervals => PromptKind::AlignIntervals,
            MatchProtocol::Lines => PromptKind::AlignLines,
        };
        let context = PromptContext::new()
            .with("REQ_TYPE", prompt::kind_label(unit.kind, self.lang))
            .with("REQ_CONTENT", unit.content.prompt_text())
            .with("CODE_CONTENT", chunk.content.clone());
        prompt::render(kind, self.lang, &context)
    }

    /// Merged ranges recovered from one response
    ///
    /// `None` is the structural-failure case for the interval protocol: a
    /// list was recovered but its members are not all two-element pairs.
    fn parse_response(&self, raw: &str) -> Option<Vec<LineRange>> {
        let output = match self.protocol {
            MatchProtocol::Intervals => parse_intervals(raw),
            MatchProtocol::Lines => parse_lines(raw),
        };
        match output {
            ModelOutput::Intervals(ranges) => Some(merge_ranges(ranges)),
            ModelOutput::Lines(lines) => Some(runs_from_lines(lines)),
            ModelOutput::Unparsed(text) => {
                if matches!(parse_payload(&text, RELATED_LINES), Some(Value::Array(_))) {
                    return None;
                }
                debug!("Response yielded no parseable intervals, chunk contributes nothing");
                Some(Vec::new())
            }
        }
    }
}
