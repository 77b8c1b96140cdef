//! Alignment pipeline driver
//!
//! Decomposes the requirement document, chunks every source file, then runs
//! the range extractor once per (unit, chunk) pair in strict sequence. The
//! wall-clock cost is `O(units x chunks)` completion round trips; nothing
//! fans out.

use tracing::{debug, info};
use traceline_llm::ChatApi;

use crate::align::{MatchProtocol, RangeExtractor};
use crate::chunk::chunk_source;
use crate::config::Config;
use crate::error::Result;
use crate::prompt::Lang;
use crate::requirement::{decompose, RequirementUnit};

/// Options for one alignment run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Model identifier sent to the endpoint
    pub model: String,
    /// Prompt language
    pub lang: Lang,
    /// Token budget per code chunk
    pub max_chunk_tokens: u32,
    /// Relevance-matching protocol
    pub protocol: MatchProtocol,
}

impl PipelineOptions {
    /// Build options from configuration, with the default protocol
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.api.model.clone(),
            lang: config.lang,
            max_chunk_tokens: config.max_chunk_tokens,
            protocol: MatchProtocol::default(),
        }
    }

    /// Set the relevance-matching protocol
    pub fn with_protocol(mut self, protocol: MatchProtocol) -> Self {
        self.protocol = protocol;
        self
    }
}

/// Align a requirement document against a set of source files
///
/// `files` are `(filename, content)` pairs. Returns the decomposed units
/// with their associated code populated. Per-unit parse failures yield
/// units with no associated code; an endpoint failure aborts the run.
pub async fn align_document(
    markdown: &str,
    files: &[(String, String)],
    options: &PipelineOptions,
    api: &dyn ChatApi,
) -> Result<Vec<RequirementUnit>> {
    let mut units = decompose(markdown);

    let mut chunks = Vec::new();
    for (filename, content) in files {
        let file_chunks = chunk_source(filename, content, options.max_chunk_tokens);
        debug!(file = %filename, chunks = file_chunks.len(), "Chunked source file");
        chunks.extend(file_chunks);
    }

    info!(
        units = units.len(),
        chunks = chunks.len(),
        protocol = ?options.protocol,
        "Starting alignment run"
    );

    let extractor = RangeExtractor::new(api, &options.model, options.lang, options.protocol);
    for unit in &mut units {
        let fragments = extractor.extract_related(unit, &chunks).await?;
        info!(
            unit = %unit.id,
            fragments = fragments.len(),
            "Aligned requirement unit"
        );
        unit.associated_code = fragments;
    }

    Ok(units)
}
