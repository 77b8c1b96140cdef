//! Requirement back-generation
//!
//! Given code fragments with no requirement attached, asks the model to
//! synthesize a plausible requirement description. Endpoint failures
//! propagate; there is no degraded output to fall back to here.

use traceline_llm::{ChatApi, ChatRequest};

use crate::align::CodeFragment;
use crate::error::Result;
use crate::prompt::{self, Lang, PromptContext, PromptKind};
use crate::review::render_fragments;

/// Synthesize a requirement description from code fragments
pub async fn generate_requirement(
    fragments: &[CodeFragment],
    api: &dyn ChatApi,
    model: &str,
    lang: Lang,
) -> Result<String> {
    let context = PromptContext::new().with("CODE_BLOCKS", render_fragments(fragments));
    let request = ChatRequest::new(model, prompt::render(PromptKind::Generate, lang, &context));
    let raw = api.complete(&request).await?;
    Ok(raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedApi;

    fn fragments() -> Vec<CodeFragment> {
        vec![CodeFragment {
            filename: "telemetry.c".to_string(),
            content: "alt = raw * 0.3048;".to_string(),
            start_line: 12,
            end_line: 12,
            review: None,
            review_opinion: String::new(),
        }]
    }

    #[tokio::test]
    async fn test_generated_text_is_trimmed() {
        let api = ScriptedApi::new(["\n  The system shall convert altitude to meters.\n"]);
        let text = generate_requirement(&fragments(), &api, "m", Lang::En)
            .await
            .unwrap();
        assert_eq!(text, "The system shall convert altitude to meters.");
    }

    #[tokio::test]
    async fn test_prompt_embeds_fragment_listing() {
        let api = ScriptedApi::new(["r"]);
        generate_requirement(&fragments(), &api, "m", Lang::Zh)
            .await
            .unwrap();
        let prompt = &api.prompts()[0];
        assert!(prompt.contains("telemetry.c [12-12]"));
        assert!(prompt.contains("alt = raw * 0.3048;"));
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let api = ScriptedApi::failing("timeout");
        let result = generate_requirement(&fragments(), &api, "m", Lang::Zh).await;
        assert!(result.is_err());
    }
}
