//! Requirement-to-code alignment
//!
//! Maps a requirement unit to the code line ranges implementing it: builds
//! the relevance prompt per code chunk, parses the model's response into
//! intervals, merges them, and slices the chunk into fragments.

mod extractor;
mod fragment;
mod intervals;

pub use extractor::{MatchProtocol, RangeExtractor};
pub use fragment::{slice_fragment, CodeFragment, Verdict};
pub use intervals::{merge_ranges, runs_from_lines, LineRange};
