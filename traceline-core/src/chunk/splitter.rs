//! Token-budgeted source chunking

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::blocks::{find_protected_blocks, first_enclosing};
use super::lines::number_line;
use super::tokens::estimate_tokens;

/// A contiguous, line-numbered window of one source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChunk {
    /// Source file the chunk came from
    pub filename: String,
    /// First line covered, 1-based inclusive
    pub start_line: u32,
    /// Last line covered, 1-based inclusive
    pub end_line: u32,
    /// Line-numbered text, one `{n}:`-prefixed line per source line
    pub content: String,
}

/// Split a source file into token-budgeted chunks
///
/// Chunks cover every line exactly once, in order. A line inside a
/// protected block pulls the block's unconsumed remainder in atomically:
/// into the current chunk if it fits or the chunk is empty, else into a
/// fresh chunk. A chunk holding a single oversize block may exceed the
/// budget; blocks are never split.
pub fn chunk_source(filename: &str, content: &str, max_tokens: u32) -> Vec<CodeChunk> {
    let numbered: Vec<String> = content
        .lines()
        .enumerate()
        .map(|(i, line)| number_line(i as u32 + 1, line))
        .collect();
    let total = numbered.len();
    if total == 0 {
        return Vec::new();
    }

    let costs: Vec<u32> = numbered.iter().map(|line| estimate_tokens(line)).collect();
    let blocks = find_protected_blocks(content);

    let mut chunks: Vec<CodeChunk> = Vec::new();
    let mut chunk_start = 0usize;
    let mut next = 0usize;
    let mut cost = 0u32;

    while next < total {
        let line_no = next as u32 + 1;
        if let Some(block) = first_enclosing(&blocks, line_no) {
            // Unconsumed remainder of the block, as 0-based exclusive end
            let take_end = (block.end_line as usize).min(total);
            let block_cost: u32 = costs[next..take_end].iter().sum();
            if next != chunk_start && cost + block_cost > max_tokens {
                chunks.push(seal(filename, &numbered, chunk_start, next));
                chunk_start = next;
                cost = 0;
            }
            cost += block_cost;
            next = take_end;
        } else {
            let line_cost = costs[next];
            if next != chunk_start && cost + line_cost > max_tokens {
                chunks.push(seal(filename, &numbered, chunk_start, next));
                chunk_start = next;
                cost = 0;
            }
            cost += line_cost;
            next += 1;
        }
    }
    if next > chunk_start {
        chunks.push(seal(filename, &numbered, chunk_start, next));
    }

    debug!(
        file = %filename,
        lines = total,
        chunks = chunks.len(),
        "Chunked source"
    );
    chunks
}

/// Build a chunk from the half-open index range `[start, end)`
fn seal(filename: &str, numbered: &[String], start: usize, end: usize) -> CodeChunk {
    CodeChunk {
        filename: filename.to_string(),
        start_line: start as u32 + 1,
        end_line: end as u32,
        content: numbered[start..end].join("\n"),
    }
}
