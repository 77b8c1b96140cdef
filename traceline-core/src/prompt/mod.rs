//! Prompt templates for the alignment and review protocols
//!
//! Templates are embedded Markdown files with `{{VARIABLE}}` placeholders,
//! one file per protocol and language. The original review workflow runs in
//! Chinese; an English set is kept in lockstep for each protocol.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::requirement::UnitKind;

const ALIGN_INTERVALS_ZH: &str = include_str!("templates/align_intervals.zh.md");
const ALIGN_INTERVALS_EN: &str = include_str!("templates/align_intervals.en.md");
const ALIGN_LINES_ZH: &str = include_str!("templates/align_lines.zh.md");
const ALIGN_LINES_EN: &str = include_str!("templates/align_lines.en.md");
const REVIEW_BLOCKS_ZH: &str = include_str!("templates/review_blocks.zh.md");
const REVIEW_BLOCKS_EN: &str = include_str!("templates/review_blocks.en.md");
const REVIEW_NARRATIVE_ZH: &str = include_str!("templates/review_narrative.zh.md");
const REVIEW_NARRATIVE_EN: &str = include_str!("templates/review_narrative.en.md");
const GENERATE_ZH: &str = include_str!("templates/generate.zh.md");
const GENERATE_EN: &str = include_str!("templates/generate.en.md");

/// Prompt language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Chinese (the original workflow's language)
    #[default]
    Zh,
    /// English
    En,
}

impl Lang {
    /// Short language code
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Zh => "zh",
            Lang::En => "en",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zh" => Ok(Lang::Zh),
            "en" => Ok(Lang::En),
            other => Err(format!("unknown language '{}', expected zh or en", other)),
        }
    }
}

/// The protocol a prompt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Relevance matching, `[[start, end], ...]` response
    AlignIntervals,
    /// Relevance matching, `{"related_lines": [...]}` response
    AlignLines,
    /// Per-block verdict review
    ReviewBlocks,
    /// Narrative review with an issue list
    ReviewNarrative,
    /// Requirement back-generation from code
    Generate,
}

/// Get the raw template for a protocol and language
pub fn template(kind: PromptKind, lang: Lang) -> &'static str {
    match (kind, lang) {
        (PromptKind::AlignIntervals, Lang::Zh) => ALIGN_INTERVALS_ZH,
        (PromptKind::AlignIntervals, Lang::En) => ALIGN_INTERVALS_EN,
        (PromptKind::AlignLines, Lang::Zh) => ALIGN_LINES_ZH,
        (PromptKind::AlignLines, Lang::En) => ALIGN_LINES_EN,
        (PromptKind::ReviewBlocks, Lang::Zh) => REVIEW_BLOCKS_ZH,
        (PromptKind::ReviewBlocks, Lang::En) => REVIEW_BLOCKS_EN,
        (PromptKind::ReviewNarrative, Lang::Zh) => REVIEW_NARRATIVE_ZH,
        (PromptKind::ReviewNarrative, Lang::En) => REVIEW_NARRATIVE_EN,
        (PromptKind::Generate, Lang::Zh) => GENERATE_ZH,
        (PromptKind::Generate, Lang::En) => GENERATE_EN,
    }
}

/// Human-readable requirement type label embedded into alignment prompts
pub fn kind_label(kind: UnitKind, lang: Lang) -> &'static str {
    match (kind, lang) {
        (UnitKind::Text, Lang::Zh) => "描述文本",
        (UnitKind::Table, Lang::Zh) => "表格",
        (UnitKind::TableRow, Lang::Zh) => "表格行",
        (UnitKind::Formula, Lang::Zh) => "公式",
        (UnitKind::Text, Lang::En) => "Text Description",
        (UnitKind::Table, Lang::En) => "Table",
        (UnitKind::TableRow, Lang::En) => "Table Row",
        (UnitKind::Formula, Lang::En) => "Formula",
    }
}

/// Variable substitutions for rendering a template
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    variables: HashMap<String, String>,
}

impl PromptContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Set a variable value (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
}

/// Render a template with the given context
pub fn render(kind: PromptKind, lang: Lang, context: &PromptContext) -> String {
    let mut result = template(kind, lang).to_string();
    for (key, value) in &context.variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_roundtrip() {
        assert_eq!("zh".parse::<Lang>().unwrap(), Lang::Zh);
        assert_eq!("en".parse::<Lang>().unwrap(), Lang::En);
        assert_eq!(Lang::Zh.to_string(), "zh");
        assert!("fr".parse::<Lang>().is_err());
    }

    #[test]
    fn test_lang_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Lang::Zh).unwrap(), "zh");
        assert_eq!(serde_json::to_value(Lang::En).unwrap(), "en");
    }

    #[test]
    fn test_align_templates_carry_placeholders() {
        for lang in [Lang::Zh, Lang::En] {
            for kind in [PromptKind::AlignIntervals, PromptKind::AlignLines] {
                let raw = template(kind, lang);
                assert!(raw.contains("{{REQ_TYPE}}"), "{:?} {:?}", kind, lang);
                assert!(raw.contains("{{REQ_CONTENT}}"));
                assert!(raw.contains("{{CODE_CONTENT}}"));
            }
        }
    }

    #[test]
    fn test_interval_template_instructs_pair_format() {
        assert!(template(PromptKind::AlignIntervals, Lang::Zh).contains("[[start1, end1]"));
        assert!(template(PromptKind::AlignIntervals, Lang::En).contains("[[start1, end1]"));
    }

    #[test]
    fn test_lines_template_instructs_related_lines_field() {
        assert!(template(PromptKind::AlignLines, Lang::Zh).contains("related_lines"));
        assert!(template(PromptKind::AlignLines, Lang::En).contains("related_lines"));
    }

    #[test]
    fn test_review_blocks_template_instructs_result_field() {
        for lang in [Lang::Zh, Lang::En] {
            let raw = template(PromptKind::ReviewBlocks, lang);
            assert!(raw.contains("review_results"));
            assert!(raw.contains("block_index"));
        }
    }

    #[test]
    fn test_narrative_template_carries_end_markers() {
        let zh = template(PromptKind::ReviewNarrative, Lang::Zh);
        assert!(zh.contains("===== 审查过程 结束 ====="));
        assert!(zh.contains("===== 问题单 结束 ====="));
        let en = template(PromptKind::ReviewNarrative, Lang::En);
        assert!(en.contains("===== Review Process End ====="));
        assert!(en.contains("===== Issue List End ====="));
    }

    #[test]
    fn test_render_substitutes_variables() {
        let context = PromptContext::new()
            .with("REQ_TYPE", "描述文本")
            .with("REQ_CONTENT", "采样周期为20ms")
            .with("CODE_CONTENT", "1:   int period = 20;");
        let rendered = render(PromptKind::AlignIntervals, Lang::Zh, &context);
        assert!(rendered.contains("采样周期为20ms"));
        assert!(rendered.contains("1:   int period = 20;"));
        assert!(!rendered.contains("{{REQ_CONTENT}}"));
    }

    #[test]
    fn test_kind_labels_match_original_protocol() {
        assert_eq!(kind_label(UnitKind::Text, Lang::Zh), "描述文本");
        assert_eq!(kind_label(UnitKind::TableRow, Lang::Zh), "表格行");
        assert_eq!(kind_label(UnitKind::Formula, Lang::En), "Formula");
    }
}
