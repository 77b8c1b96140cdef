//! Decompose command

use std::path::PathBuf;

use clap::Args;
use traceline_core::decompose;

/// Decompose a Markdown requirement document into typed units
#[derive(Args, Debug)]
pub struct DecomposeArgs {
    /// Markdown requirement document
    pub file: PathBuf,

    /// Print a one-line summary per unit instead of JSON
    #[arg(long)]
    pub summary: bool,
}

impl DecomposeArgs {
    /// Execute the decompose command
    pub fn execute(&self) -> anyhow::Result<()> {
        let markdown = std::fs::read_to_string(&self.file)?;
        let units = decompose(&markdown);

        if self.summary {
            for unit in &units {
                println!("{:<16} [{:?}] {}", unit.id, unit.kind, unit.context.join(" > "));
            }
            println!();
            println!("{} unit(s)", units.len());
        } else {
            println!("{}", serde_json::to_string_pretty(&units)?);
        }
        Ok(())
    }
}
