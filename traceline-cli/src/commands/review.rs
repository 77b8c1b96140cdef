//! Review command

use std::path::PathBuf;

use clap::Args;
use traceline_core::{Config, Reviewer, Verdict};
use traceline_llm::LlmClient;
use traceline_store::AlignmentStore;

/// Review aligned code for consistency with its requirement
#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Alignment store holding the unit
    pub store: PathBuf,

    /// Id of the requirement unit to review
    pub unit_id: String,

    /// Produce a narrative with an issue list instead of per-block verdicts
    #[arg(long)]
    pub narrative: bool,
}

impl ReviewArgs {
    /// Execute the review command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut store = AlignmentStore::load(&self.store)?;
        let mut record = store
            .get(&self.unit_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no alignment record for unit '{}'", self.unit_id))?;

        if record.unit.associated_code.is_empty() {
            anyhow::bail!("unit '{}' has no associated code to review", self.unit_id);
        }

        let client = LlmClient::new(&config.api.base_url, &config.api.api_key)?;
        let reviewer = Reviewer::new(&client, &config.api.model, config.lang);
        let requirement = record.unit.content.prompt_text();

        if self.narrative {
            let review = reviewer
                .review_narrative(&requirement, &record.unit.associated_code)
                .await;
            println!("{}", review.process);
            println!();
            println!("{}", review.issues);
            record.review_process = Some(review.process);
            record.issues = Some(review.issues);
        } else {
            let fragments = std::mem::take(&mut record.unit.associated_code);
            let reviewed = reviewer.review_blocks(&requirement, fragments).await;
            for (index, fragment) in reviewed.iter().enumerate() {
                let verdict = match fragment.review {
                    Some(Verdict::Pass) => "pass",
                    Some(Verdict::Fail) => "fail",
                    None => "null",
                };
                println!(
                    "block {} ({} [{}-{}]): {}",
                    index, fragment.filename, fragment.start_line, fragment.end_line, verdict
                );
                if !fragment.review_opinion.is_empty() {
                    println!("  {}", fragment.review_opinion);
                }
            }
            record.unit.associated_code = reviewed;
        }

        store.put(record);
        store.save()?;
        Ok(())
    }
}
