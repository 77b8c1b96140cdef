//! Source code chunking
//!
//! Turns a source file into line-numbered, token-budgeted windows that
//! never split a brace-delimited structural block.

mod blocks;
mod lines;
mod splitter;
mod tokens;

pub use blocks::{find_protected_blocks, first_enclosing, ProtectedBlock};
pub use lines::{number_line, parse_numbered};
pub use splitter::{chunk_source, CodeChunk};
pub use tokens::estimate_tokens;
