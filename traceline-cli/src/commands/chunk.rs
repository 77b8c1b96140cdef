//! Chunk command

use std::path::PathBuf;

use clap::Args;
use traceline_core::{chunk_source, Config};

/// Chunk a source file into token-budgeted windows
#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// Source file to chunk
    pub file: PathBuf,

    /// Token budget per chunk (overrides config)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Print a one-line summary per chunk instead of JSON
    #[arg(long)]
    pub summary: bool,
}

impl ChunkArgs {
    /// Execute the chunk command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.file)?;
        let filename = self.file.display().to_string();
        let budget = self.max_tokens.unwrap_or(config.max_chunk_tokens);

        let chunks = chunk_source(&filename, &content, budget);

        if self.summary {
            for chunk in &chunks {
                println!(
                    "lines {:>5}-{:<5} ({} lines)",
                    chunk.start_line,
                    chunk.end_line,
                    chunk.end_line - chunk.start_line + 1
                );
            }
            println!();
            println!("{} chunk(s), budget {} tokens", chunks.len(), budget);
        } else {
            println!("{}", serde_json::to_string_pretty(&chunks)?);
        }
        Ok(())
    }
}
