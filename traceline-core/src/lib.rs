//! Traceline Core - requirement-to-code alignment and consistency review
//!
//! This crate implements the alignment pipeline: decomposing a Markdown
//! requirement document into typed units, chunking source code into
//! token-budgeted windows that never split a structural block, matching
//! units to code line ranges through a completion model, and reviewing
//! the matched code for consistency with the requirement.

pub mod align;
pub mod chunk;
pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod requirement;
pub mod review;

pub use align::{CodeFragment, MatchProtocol, RangeExtractor, Verdict};
pub use chunk::{chunk_source, CodeChunk};
pub use config::{ApiConfig, Config};
pub use error::{Error, Result};
pub use generate::generate_requirement;
pub use output::ModelOutput;
pub use pipeline::{align_document, PipelineOptions};
pub use prompt::Lang;
pub use requirement::{decompose, RequirementUnit, UnitContent, UnitKind};
pub use review::{NarrativeReview, Reviewer};

#[cfg(test)]
pub(crate) mod testing;
