//! Requirement unit types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::align::CodeFragment;

/// The kind of a requirement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// A paragraph group of prose
    Text,
    /// A whole Markdown table, full markup
    Table,
    /// One data row of a table, keyed by column header
    TableRow,
    /// A LaTeX-delimited formula
    Formula,
}

impl UnitKind {
    /// Identifier prefix used when assigning unit ids
    ///
    /// Table rows derive their id from the parent table instead.
    pub fn prefix(&self) -> &'static str {
        match self {
            UnitKind::Text => "text",
            UnitKind::Table => "table",
            UnitKind::TableRow => "row",
            UnitKind::Formula => "formula",
        }
    }
}

/// Content payload of a requirement unit
///
/// Serialized untagged: a plain JSON string for prose, tables, and formulas,
/// a JSON object for table rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitContent {
    /// Prose, table markup, or formula text
    Text(String),
    /// Header-to-cell mapping for one table row, in column order
    Row(IndexMap<String, String>),
}

impl UnitContent {
    /// Render the content for embedding into a prompt
    ///
    /// Rows become one `header: cell` line per column.
    pub fn prompt_text(&self) -> String {
        match self {
            UnitContent::Text(text) => text.clone(),
            UnitContent::Row(row) => row
                .iter()
                .map(|(header, cell)| format!("{}: {}", header, cell))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// One atomic, independently alignable piece of a requirement document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementUnit {
    /// Unique id within one decomposition pass (e.g. `text_3`, `table_5_row_0`)
    pub id: String,
    /// Unit kind
    pub kind: UnitKind,
    /// Content payload
    pub content: UnitContent,
    /// Heading breadcrumb from the document root down to this unit
    pub context: Vec<String>,
    /// Code fragments judged to implement this unit
    #[serde(default)]
    pub associated_code: Vec<CodeFragment>,
}

impl RequirementUnit {
    /// Create a unit with no associated code
    pub fn new(
        id: impl Into<String>,
        kind: UnitKind,
        content: UnitContent,
        context: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            content,
            context,
            associated_code: Vec::new(),
        }
    }
}
