//! Line interval merging

/// An inclusive range of 1-based line numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// Merge overlapping or line-adjacent ranges into a minimal ordered cover
///
/// Ranges are sorted ascending by start, then folded in a single sweep:
/// a range merges into its predecessor when its start is at most the
/// predecessor's end plus one. The result is sorted, pairwise disjoint,
/// and keeps a gap of at least two lines between consecutive ranges.
pub fn merge_ranges(mut ranges: Vec<LineRange>) -> Vec<LineRange> {
    ranges.sort_by_key(|range| range.start);
    let mut merged: Vec<LineRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(prev) if range.start <= prev.end + 1 => prev.end = prev.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

/// Collapse a flat list of line numbers into maximal consecutive runs
pub fn runs_from_lines(mut lines: Vec<u32>) -> Vec<LineRange> {
    lines.sort_unstable();
    lines.dedup();
    let mut runs: Vec<LineRange> = Vec::new();
    for line in lines {
        match runs.last_mut() {
            Some(prev) if line == prev.end + 1 => prev.end = line,
            _ => runs.push(LineRange::new(line, line)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> LineRange {
        LineRange::new(start, end)
    }

    #[test]
    fn test_overlapping_ranges_merge() {
        let merged = merge_ranges(vec![range(10, 12), range(11, 15)]);
        assert_eq!(merged, vec![range(10, 15)]);
    }

    #[test]
    fn test_adjacent_ranges_merge() {
        let merged = merge_ranges(vec![range(1, 3), range(4, 6)]);
        assert_eq!(merged, vec![range(1, 6)]);
    }

    #[test]
    fn test_gap_of_two_stays_separate() {
        let merged = merge_ranges(vec![range(1, 3), range(5, 6)]);
        assert_eq!(merged, vec![range(1, 3), range(5, 6)]);
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let merged = merge_ranges(vec![range(20, 25), range(1, 2), range(22, 30)]);
        assert_eq!(merged, vec![range(1, 2), range(20, 30)]);
    }

    #[test]
    fn test_contained_range_is_absorbed() {
        let merged = merge_ranges(vec![range(1, 10), range(3, 5)]);
        assert_eq!(merged, vec![range(1, 10)]);
    }

    #[test]
    fn test_merge_preserves_covered_union() {
        let input = vec![range(7, 9), range(1, 4), range(3, 5), range(11, 11)];
        let merged = merge_ranges(input.clone());

        let covered = |ranges: &[LineRange]| -> Vec<u32> {
            let mut lines: Vec<u32> = ranges
                .iter()
                .flat_map(|r| r.start..=r.end)
                .collect();
            lines.sort_unstable();
            lines.dedup();
            lines
        };
        assert_eq!(covered(&merged), covered(&input));

        for pair in merged.windows(2) {
            assert!(pair[1].start > pair[0].end + 1);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_ranges(Vec::new()).is_empty());
    }

    #[test]
    fn test_runs_from_lines() {
        let runs = runs_from_lines(vec![12, 10, 11, 3, 1, 2, 20]);
        assert_eq!(runs, vec![range(1, 3), range(10, 12), range(20, 20)]);
    }

    #[test]
    fn test_runs_ignore_duplicates() {
        let runs = runs_from_lines(vec![5, 5, 6, 6, 7]);
        assert_eq!(runs, vec![range(5, 7)]);
    }

    #[test]
    fn test_runs_empty() {
        assert!(runs_from_lines(Vec::new()).is_empty());
    }
}
