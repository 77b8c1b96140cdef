//! Per-block verdict parsing and application

use serde::Deserialize;
use tracing::warn;

use crate::align::{CodeFragment, Verdict};
use crate::output::parse_payload;

/// Field the review prompt wraps its verdict list in
const REVIEW_RESULTS: &str = "review_results";

/// One verdict entry from the model, addressed by fragment index
#[derive(Debug, Deserialize)]
pub(crate) struct BlockVerdict {
    pub block_index: usize,
    pub verdict: Verdict,
    #[serde(default)]
    pub technical_analysis: String,
}

/// Parse the verdict list out of a raw review response
///
/// Accepts the `review_results` field or a bare list; `None` when no list
/// deserializes, including entries with an unknown verdict tag.
pub(crate) fn parse_verdicts(raw: &str) -> Option<Vec<BlockVerdict>> {
    let payload = parse_payload(raw, REVIEW_RESULTS)?;
    serde_json::from_value(payload).ok()
}

/// Apply verdict entries to their fragments by index
pub(crate) fn apply_verdicts(fragments: &mut [CodeFragment], verdicts: Vec<BlockVerdict>) {
    for entry in verdicts {
        let Some(fragment) = fragments.get_mut(entry.block_index) else {
            warn!(
                index = entry.block_index,
                fragments = fragments.len(),
                "Verdict index out of range, skipping"
            );
            continue;
        };
        fragment.review = Some(entry.verdict);
        fragment.review_opinion = entry.technical_analysis;
    }
}

/// Reset every fragment to a null verdict carrying `message`
pub(crate) fn fail_all(fragments: &mut [CodeFragment], message: &str) {
    for fragment in fragments {
        fragment.review = None;
        fragment.review_opinion = message.to_string();
    }
}
