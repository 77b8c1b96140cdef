//! Protected structural blocks
//!
//! A heuristic lexer for brace-delimited structural units in C-family
//! sources. Three independent regex scans locate function, class/struct,
//! and namespace definitions by a permissive opening-brace pattern; the end
//! of each block is found by counting balanced braces forward. Scans run
//! over a comment-blanked shadow of the source so braces in comments cannot
//! mis-locate a block end; braces inside string literals remain a known
//! limitation of the heuristic.

use std::sync::OnceLock;

use regex::Regex;

/// A brace-delimited structural unit the chunker must not split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectedBlock {
    /// First line of the definition, 1-based
    pub start_line: u32,
    /// Line of the closing brace, 1-based
    pub end_line: u32,
}

impl ProtectedBlock {
    /// Whether `line` falls inside this block
    pub fn contains(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

fn function_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z_][\w:<>,*&\s]*\s[A-Za-z_]\w*\s*\([^()]*\)\s*(?:const\s*)?\{")
            .expect("function regex compiles")
    })
}

fn type_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:class|struct)\s+[A-Za-z_]\w*[^{;]*\{").expect("type regex compiles")
    })
}

fn namespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bnamespace(?:\s+[A-Za-z_][\w:]*)?\s*\{").expect("namespace regex compiles")
    })
}

/// Locate protected blocks with three independent scans
///
/// Scan order is functions, then class/struct, then namespaces. Results are
/// concatenated without deduplication; overlap between scans is expected
/// and lookups return the first enclosing block in that order.
pub fn find_protected_blocks(source: &str) -> Vec<ProtectedBlock> {
    let shadow = blank_comments(source);
    let total_lines = shadow.lines().count() as u32;

    let mut blocks = Vec::new();
    for regex in [function_regex(), type_regex(), namespace_regex()] {
        for found in regex.find_iter(&shadow) {
            blocks.push(block_from_match(&shadow, found.start(), found.end(), total_lines));
        }
    }
    blocks
}

/// First block containing `line`, in scan-concatenation order
pub fn first_enclosing(blocks: &[ProtectedBlock], line: u32) -> Option<ProtectedBlock> {
    blocks.iter().copied().find(|block| block.contains(line))
}

fn block_from_match(shadow: &str, start: usize, end: usize, total_lines: u32) -> ProtectedBlock {
    let start_line = line_of(shadow, start);
    // The last character of every scan pattern is the opening brace
    let end_line = match match_brace(shadow, end - 1) {
        Some(close) => line_of(shadow, close),
        // Unbalanced input: the block runs to end of file
        None => total_lines.max(start_line),
    };
    ProtectedBlock {
        start_line,
        end_line,
    }
}

/// 1-based line number of a byte offset
fn line_of(text: &str, offset: usize) -> u32 {
    text.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count() as u32
        + 1
}

/// Byte offset of the brace closing the one at `open`
fn match_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0u32;
    for (i, &b) in text.as_bytes()[open..].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Replace `//` and `/* */` comment text with spaces, preserving newlines
/// so line numbers in the shadow match the source
fn blank_comments(source: &str) -> String {
    enum State {
        Code,
        Line,
        Block,
    }

    let mut state = State::Code;
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(ch) = chars.next() {
        match state {
            State::Code => {
                if ch == '/' {
                    match chars.peek() {
                        Some('/') => {
                            chars.next();
                            out.push_str("  ");
                            state = State::Line;
                        }
                        Some('*') => {
                            chars.next();
                            out.push_str("  ");
                            state = State::Block;
                        }
                        _ => out.push(ch),
                    }
                } else {
                    out.push(ch);
                }
            }
            State::Line => {
                if ch == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::Block => {
                if ch == '\n' {
                    out.push('\n');
                } else if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_function() {
        let source = "int main() {\n    return 0;\n}\n";
        let blocks = find_protected_blocks(source);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], ProtectedBlock { start_line: 1, end_line: 3 });
    }

    #[test]
    fn test_nested_braces_inside_function() {
        let source = "void f() {\n    if (x) {\n        y();\n    }\n}\nint z;\n";
        let blocks = find_protected_blocks(source);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].end_line, 5);
    }

    #[test]
    fn test_multiline_parameter_list() {
        let source = "int add(int a,\n        int b) {\n    return a + b;\n}\n";
        let blocks = find_protected_blocks(source);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], ProtectedBlock { start_line: 1, end_line: 4 });
    }

    #[test]
    fn test_class_definition() {
        let source = "class Foo : public Bar {\npublic:\n    int x;\n};\n";
        let blocks = find_protected_blocks(source);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], ProtectedBlock { start_line: 1, end_line: 4 });
    }

    #[test]
    fn test_forward_declaration_is_not_a_block() {
        assert!(find_protected_blocks("class Foo;\n").is_empty());
    }

    #[test]
    fn test_namespace_block() {
        let source = "namespace util {\nint x;\n}\n";
        let blocks = find_protected_blocks(source);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], ProtectedBlock { start_line: 1, end_line: 3 });
    }

    #[test]
    fn test_overlapping_scans_keep_both_blocks() {
        let source = "namespace n {\nvoid f() {\n    g();\n}\n}\n";
        let blocks = find_protected_blocks(source);
        // Function scan first, then namespace scan
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], ProtectedBlock { start_line: 2, end_line: 4 });
        assert_eq!(blocks[1], ProtectedBlock { start_line: 1, end_line: 5 });
    }

    #[test]
    fn test_first_enclosing_respects_scan_order() {
        let blocks = vec![
            ProtectedBlock { start_line: 2, end_line: 4 },
            ProtectedBlock { start_line: 1, end_line: 5 },
        ];
        assert_eq!(first_enclosing(&blocks, 3), Some(blocks[0]));
        assert_eq!(first_enclosing(&blocks, 5), Some(blocks[1]));
        assert_eq!(first_enclosing(&blocks, 6), None);
    }

    #[test]
    fn test_brace_in_line_comment_ignored() {
        let source = "// stray {\nint f() {\n    return 1;\n}\n";
        let blocks = find_protected_blocks(source);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], ProtectedBlock { start_line: 2, end_line: 4 });
    }

    #[test]
    fn test_brace_in_block_comment_ignored() {
        let source = "int f() {\n    /* } not the end */\n    return 1;\n}\n";
        let blocks = find_protected_blocks(source);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].end_line, 4);
    }

    #[test]
    fn test_commented_out_function_not_found() {
        assert!(find_protected_blocks("// int f() { return 1; }\n").is_empty());
    }

    #[test]
    fn test_unbalanced_block_runs_to_end_of_file() {
        let source = "void f() {\n    int x;\n    int y;\n";
        let blocks = find_protected_blocks(source);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], ProtectedBlock { start_line: 1, end_line: 3 });
    }

    #[test]
    fn test_blank_comments_preserves_line_structure() {
        let shadow = blank_comments("a // c\nb /* x\ny */ c\n");
        assert_eq!(shadow.lines().count(), 3);
        assert!(!shadow.contains("c\nb"));
        assert!(shadow.starts_with("a "));
    }
}
