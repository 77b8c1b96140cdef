//! Consistency review of requirement/code pairs
//!
//! Two protocols share one engine: per-block pass/fail verdicts and a
//! free-text review narrative with an issue list. Both catch endpoint and
//! parse failures at this boundary and degrade to null verdicts or raw
//! passthrough; neither ever raises past it.

mod blocks;
mod narrative;

use tracing::warn;
use traceline_llm::{ChatApi, ChatRequest};

use crate::align::CodeFragment;
use crate::prompt::{self, Lang, PromptContext, PromptKind};

pub use narrative::NarrativeReview;

/// Reviews matched code fragments against their requirement
pub struct Reviewer<'a> {
    api: &'a dyn ChatApi,
    model: &'a str,
    lang: Lang,
}

impl<'a> Reviewer<'a> {
    /// Create a reviewer over the given completion backend
    pub fn new(api: &'a dyn ChatApi, model: &'a str, lang: Lang) -> Self {
        Self { api, model, lang }
    }

    /// Per-block verdict protocol
    ///
    /// Returns the fragments with `review`/`review_opinion` populated from
    /// the model's indexed verdicts. On an endpoint or parse failure every
    /// fragment gets a null verdict and the error text as its opinion.
    pub async fn review_blocks(
        &self,
        requirement: &str,
        mut fragments: Vec<CodeFragment>,
    ) -> Vec<CodeFragment> {
        if fragments.is_empty() {
            return fragments;
        }
        let prompt = self.build_prompt(PromptKind::ReviewBlocks, requirement, &fragments);
        let request = ChatRequest::new(self.model, prompt);
        let raw = match self.api.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Review completion failed, recording null verdicts");
                blocks::fail_all(&mut fragments, &e.to_string());
                return fragments;
            }
        };
        match blocks::parse_verdicts(&raw) {
            Some(verdicts) => blocks::apply_verdicts(&mut fragments, verdicts),
            None => {
                warn!("Review response could not be parsed, recording null verdicts");
                blocks::fail_all(&mut fragments, "review response could not be parsed");
            }
        }
        fragments
    }

    /// Narrative + issue-list protocol
    ///
    /// Returns the analysis narrative and the issue list. An endpoint
    /// failure degrades to the error text as the narrative and the
    /// unparsed-issues sentinel as the list.
    pub async fn review_narrative(
        &self,
        requirement: &str,
        fragments: &[CodeFragment],
    ) -> NarrativeReview {
        let prompt = self.build_prompt(PromptKind::ReviewNarrative, requirement, fragments);
        let request = ChatRequest::new(self.model, prompt);
        match self.api.complete(&request).await {
            Ok(raw) => narrative::parse_narrative(&raw, self.lang),
            Err(e) => {
                warn!(error = %e, "Review completion failed, degrading to error narrative");
                NarrativeReview {
                    process: e.to_string(),
                    issues: narrative::sentinel(self.lang).to_string(),
                }
            }
        }
    }

    fn build_prompt(
        &self,
        kind: PromptKind,
        requirement: &str,
        fragments: &[CodeFragment],
    ) -> String {
        let context = PromptContext::new()
            .with("REQUIREMENT", requirement)
            .with("CODE_BLOCKS", render_fragments(fragments));
        prompt::render(kind, self.lang, &context)
    }
}

/// Render fragments as an indexed listing for embedding into a prompt
pub(crate) fn render_fragments(fragments: &[CodeFragment]) -> String {
    fragments
        .iter()
        .enumerate()
        .map(|(index, fragment)| {
            format!(
                "### Block {} ({} [{}-{}])\n{}",
                index, fragment.filename, fragment.start_line, fragment.end_line, fragment.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
