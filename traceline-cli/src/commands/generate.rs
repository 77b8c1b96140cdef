//! Generate command

use std::path::PathBuf;

use clap::Args;
use traceline_core::{generate_requirement, Config};
use traceline_llm::LlmClient;
use traceline_store::AlignmentStore;

/// Generate a requirement description from a unit's aligned code
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Alignment store holding the unit
    pub store: PathBuf,

    /// Id of the requirement unit whose code to describe
    pub unit_id: String,
}

impl GenerateArgs {
    /// Execute the generate command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = AlignmentStore::load(&self.store)?;
        let record = store
            .get(&self.unit_id)
            .ok_or_else(|| anyhow::anyhow!("no alignment record for unit '{}'", self.unit_id))?;

        if record.unit.associated_code.is_empty() {
            anyhow::bail!("unit '{}' has no associated code to describe", self.unit_id);
        }

        let client = LlmClient::new(&config.api.base_url, &config.api.api_key)?;
        let text = generate_requirement(
            &record.unit.associated_code,
            &client,
            &config.api.model,
            config.lang,
        )
        .await?;

        println!("{}", text);
        Ok(())
    }
}
