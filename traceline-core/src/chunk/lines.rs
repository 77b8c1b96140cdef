//! Line numbering scheme shared by the chunker and the range extractor
//!
//! Every source line carries a `{n}:` prefix padded right to at least five
//! columns. Stripping reverses the prefix exactly, so fragment content is
//! always a verbatim slice of the source.

const PREFIX_WIDTH: usize = 5;

/// Width of the `{n}:` prefix, padding included
fn prefix_width(number: u32) -> usize {
    let digits = number.checked_ilog10().unwrap_or(0) as usize + 1;
    (digits + 1).max(PREFIX_WIDTH)
}

/// Prefix one line with its 1-based number
pub fn number_line(number: u32, line: &str) -> String {
    format!("{:<width$}{}", format!("{}:", number), line, width = PREFIX_WIDTH)
}

/// Parse a numbered line back into its number and exact original content
///
/// Returns `None` when the prefix is missing or not numeric.
pub fn parse_numbered(line: &str) -> Option<(u32, &str)> {
    let colon = line.find(':')?;
    let number: u32 = line[..colon].parse().ok()?;
    let width = prefix_width(number);
    Some((number, line.get(width..).unwrap_or("")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_line_pads_to_five_columns() {
        assert_eq!(number_line(1, "fn main() {"), "1:   fn main() {");
        assert_eq!(number_line(42, "x"), "42:  x");
        assert_eq!(number_line(9999, "x"), "9999:x");
    }

    #[test]
    fn test_wide_numbers_extend_the_prefix() {
        assert_eq!(number_line(123456, "x"), "123456:x");
    }

    #[test]
    fn test_parse_numbered_roundtrip() {
        for (number, content) in [(1, "fn main() {"), (42, "  indented"), (123456, "x")] {
            let numbered = number_line(number, content);
            assert_eq!(parse_numbered(&numbered), Some((number, content)));
        }
    }

    #[test]
    fn test_parse_preserves_content_with_colons() {
        let numbered = number_line(12, "5: foo");
        assert_eq!(parse_numbered(&numbered), Some((12, "5: foo")));
    }

    #[test]
    fn test_parse_empty_content() {
        let numbered = number_line(7, "");
        assert_eq!(parse_numbered(&numbered), Some((7, "")));
    }

    #[test]
    fn test_parse_rejects_non_numeric_prefix() {
        assert_eq!(parse_numbered("abc: x"), None);
        assert_eq!(parse_numbered("no colon here"), None);
    }
}
