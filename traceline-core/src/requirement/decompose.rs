//! Requirement document decomposer
//!
//! Walks a Markdown document line by line, maintaining a heading breadcrumb
//! stack, and emits one typed unit per paragraph group, table, table row,
//! and formula. Structural units come out in document order; formula units
//! are collected in a separate pass over the raw text and appended after
//! all structural units.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use super::{RequirementUnit, UnitContent, UnitKind};

/// Decompose a Markdown requirement document into an ordered list of units
pub fn decompose(markdown: &str) -> Vec<RequirementUnit> {
    let mut units: Vec<RequirementUnit> = Vec::new();
    let mut breadcrumb: Vec<String> = Vec::new();
    let mut buffer: Vec<String> = Vec::new();

    let lines: Vec<&str> = markdown.lines().collect();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        if let Some((level, text)) = parse_heading(line) {
            // The buffer belongs to the breadcrumb as it stood before this
            // heading changes it.
            flush_text(&mut units, &mut buffer, &breadcrumb);
            breadcrumb.truncate(level - 1);
            breadcrumb.push(text.to_string());
            i += 1;
            continue;
        }

        if is_table_line(line) {
            flush_text(&mut units, &mut buffer, &breadcrumb);
            let start = i;
            while i < lines.len() && is_table_line(lines[i].trim()) {
                i += 1;
            }
            emit_table(&mut units, &lines[start..i], &breadcrumb);
            continue;
        }

        if !line.is_empty() {
            buffer.push(strip_list_marker(line).to_string());
        }
        i += 1;
    }
    flush_text(&mut units, &mut buffer, &breadcrumb);

    emit_formulas(&mut units, markdown, &breadcrumb);

    units
}

/// Parse an ATX heading, returning its level and text
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    let mut text = rest.trim();
    // Optional ATX closing sequence: "## Title ##"
    let stripped = text.trim_end_matches('#');
    if stripped.len() < text.len() && stripped.ends_with(' ') {
        text = stripped.trim_end();
    }
    Some((hashes, text))
}

fn is_table_line(line: &str) -> bool {
    line.starts_with('|')
}

/// Drop a leading bullet or ordered-list marker, keeping the item text
fn strip_list_marker(line: &str) -> &str {
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim_start();
        }
    }
    line
}

/// Flush accumulated prose as one Text unit
fn flush_text(units: &mut Vec<RequirementUnit>, buffer: &mut Vec<String>, breadcrumb: &[String]) {
    if buffer.is_empty() {
        return;
    }
    let id = format!("{}_{}", UnitKind::Text.prefix(), units.len());
    units.push(RequirementUnit::new(
        id,
        UnitKind::Text,
        UnitContent::Text(buffer.join("\n")),
        breadcrumb.to_vec(),
    ));
    buffer.clear();
}

/// Emit one Table unit for the whole markup plus one TableRow per data row
fn emit_table(units: &mut Vec<RequirementUnit>, raw_lines: &[&str], breadcrumb: &[String]) {
    let table_id = format!("{}_{}", UnitKind::Table.prefix(), units.len());
    units.push(RequirementUnit::new(
        table_id.clone(),
        UnitKind::Table,
        UnitContent::Text(raw_lines.join("\n")),
        breadcrumb.to_vec(),
    ));

    let rows: Vec<Vec<String>> = raw_lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !is_separator_row(line))
        .map(split_row)
        .collect();
    let Some((header, data)) = rows.split_first() else {
        return;
    };

    let mut row_context = breadcrumb.to_vec();
    row_context.push(table_id.clone());
    for (index, cells) in data.iter().enumerate() {
        let mut content = IndexMap::new();
        for (col, name) in header.iter().enumerate() {
            content.insert(name.clone(), cells.get(col).cloned().unwrap_or_default());
        }
        units.push(RequirementUnit::new(
            format!("{}_row_{}", table_id, index),
            UnitKind::TableRow,
            UnitContent::Row(content),
            row_context.clone(),
        ));
    }
}

/// Split a table line into trimmed cells, keeping empty cells positional
fn split_row(line: &str) -> Vec<String> {
    let inner = line.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// A separator row: every cell is dashes with optional alignment colons
fn is_separator_row(line: &str) -> bool {
    let cells = split_row(line);
    !cells.is_empty()
        && cells.iter().all(|cell| {
            cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
        })
}

fn formula_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\$\$(.+?)\$\$|\$(.+?)\$").expect("formula regex compiles")
    })
}

/// Scan the raw document for `$...$` and `$$...$$` formulas
///
/// Formulas carry the breadcrumb as it stood at the end of the walk, and an
/// independent zero-based counter for their ids.
fn emit_formulas(units: &mut Vec<RequirementUnit>, markdown: &str, breadcrumb: &[String]) {
    for (index, captures) in formula_regex().captures_iter(markdown).enumerate() {
        let body = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map(|m| m.as_str().trim())
            .unwrap_or_default();
        units.push(RequirementUnit::new(
            format!("{}_{}", UnitKind::Formula.prefix(), index),
            UnitKind::Formula,
            UnitContent::Text(format!("$$ {} $$", body)),
            breadcrumb.to_vec(),
        ));
    }
}
