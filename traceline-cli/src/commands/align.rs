//! Align command

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use traceline_core::{align_document, Config, MatchProtocol, PipelineOptions};
use traceline_llm::LlmClient;
use traceline_store::{AlignmentRecord, AlignmentStore};

/// Relevance-matching protocol flag
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ProtocolArg {
    /// The model returns `[[start, end], ...]` intervals
    Intervals,
    /// The model returns `{"related_lines": [...]}` line numbers
    Lines,
}

impl From<ProtocolArg> for MatchProtocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Intervals => MatchProtocol::Intervals,
            ProtocolArg::Lines => MatchProtocol::Lines,
        }
    }
}

/// Align a requirement document against source files
#[derive(Args, Debug)]
pub struct AlignArgs {
    /// Markdown requirement document
    pub requirements: PathBuf,

    /// Source files to align against
    #[arg(required = true)]
    pub code: Vec<PathBuf>,

    /// Relevance-matching protocol
    #[arg(long, value_enum, default_value_t = ProtocolArg::Intervals)]
    pub protocol: ProtocolArg,

    /// Token budget per chunk (overrides config)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Write results into this alignment store instead of stdout
    #[arg(long)]
    pub store: Option<PathBuf>,
}

impl AlignArgs {
    /// Execute the align command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let markdown = std::fs::read_to_string(&self.requirements)?;

        let mut files = Vec::new();
        for path in &self.code {
            let content = std::fs::read_to_string(path)?;
            files.push((path.display().to_string(), content));
        }

        let client = LlmClient::new(&config.api.base_url, &config.api.api_key)?;
        let mut options = PipelineOptions::from_config(config).with_protocol(self.protocol.into());
        if let Some(budget) = self.max_tokens {
            options.max_chunk_tokens = budget;
        }

        let units = align_document(&markdown, &files, &options, &client).await?;

        match &self.store {
            Some(path) => {
                let mut store = AlignmentStore::load(path)?;
                let count = units.len();
                let aligned = units
                    .iter()
                    .filter(|unit| !unit.associated_code.is_empty())
                    .count();
                for unit in units {
                    store.put(AlignmentRecord::new(unit));
                }
                store.save()?;
                println!(
                    "Aligned {} unit(s) ({} with related code) into {}",
                    count,
                    aligned,
                    path.display()
                );
            }
            None => {
                println!("{}", serde_json::to_string_pretty(&units)?);
            }
        }
        Ok(())
    }
}
