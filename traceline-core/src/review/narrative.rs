//! Narrative review parsing
//!
//! The narrative protocol expects two sections in fixed order, analysis
//! first and issues second, each terminated by a literal end marker. Model
//! output drifts from that shape often enough that parsing falls through
//! four strategies in strict order: both end markers, per-section regex,
//! a single split on the issues heading, and a scan for individual issue
//! statements. The last resort returns the raw text with a sentinel issue
//! list. The strategy order is load-bearing; fixtures pin it.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::prompt::Lang;

/// Result of a narrative review: analysis text plus the issue list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeReview {
    /// The analysis narrative
    pub process: String,
    /// The issue list, or the unparsed-issues sentinel
    pub issues: String,
}

struct Markers {
    process_heading: &'static str,
    issues_heading: &'static str,
    process_end: &'static str,
    issues_end: &'static str,
    sentinel: &'static str,
}

const ZH: Markers = Markers {
    process_heading: "审查过程",
    issues_heading: "问题单",
    process_end: "===== 审查过程 结束 =====",
    issues_end: "===== 问题单 结束 =====",
    sentinel: "未能解析出问题单",
};

const EN: Markers = Markers {
    process_heading: "Review Process",
    issues_heading: "Issue List",
    process_end: "===== Review Process End =====",
    issues_end: "===== Issue List End =====",
    sentinel: "No issues could be parsed",
};

fn markers(lang: Lang) -> &'static Markers {
    match lang {
        Lang::Zh => &ZH,
        Lang::En => &EN,
    }
}

/// The unparsed-issues sentinel for a language
pub(crate) fn sentinel(lang: Lang) -> &'static str {
    markers(lang).sentinel
}

fn zh_process_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)审查过程[:：]?\s*(.*?)\s*===== 审查过程 结束 =====")
            .expect("zh process regex compiles")
    })
}

fn zh_issues_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)问题单[:：]?\s*(.*?)\s*===== 问题单 结束 =====")
            .expect("zh issues regex compiles")
    })
}

fn en_process_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Review Process[:：]?\s*(.*?)\s*===== Review Process End =====")
            .expect("en process regex compiles")
    })
}

fn en_issues_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Issue List[:：]?\s*(.*?)\s*===== Issue List End =====")
            .expect("en issues regex compiles")
    })
}

fn zh_issue_statement_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"在[^\n]+?的[^\n]+?方面，代码实现为[^\n]+?，而需求为[^\n]+?，不一致原因[:：][^\n]+")
            .expect("zh issue statement regex compiles")
    })
}

fn en_issue_statement_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"At [^\n]+? in [^\n]+?, the implementation is [^\n]+? while the requirement is [^\n]+?, inconsistent because [^\n]+",
        )
        .expect("en issue statement regex compiles")
    })
}

/// Parse a raw narrative response into its two sections
pub(crate) fn parse_narrative(raw: &str, lang: Lang) -> NarrativeReview {
    let m = markers(lang);

    if let Some(review) = split_on_end_markers(raw, m) {
        return review;
    }
    if let Some(review) = capture_sections(raw, lang) {
        return review;
    }
    if let Some(review) = split_on_issues_heading(raw, m) {
        return review;
    }
    if let Some(review) = scan_issue_statements(raw, lang) {
        return review;
    }
    debug!("No narrative strategy matched, passing raw text through");
    NarrativeReview {
        process: raw.to_string(),
        issues: m.sentinel.to_string(),
    }
}

/// Strategy 1: both end markers present, in order
fn split_on_end_markers(raw: &str, m: &Markers) -> Option<NarrativeReview> {
    let (before, rest) = raw.split_once(m.process_end)?;
    let (between, _) = rest.split_once(m.issues_end)?;
    Some(NarrativeReview {
        process: strip_heading(before, m.process_heading),
        issues: strip_heading(between, m.issues_heading),
    })
}

/// Strategy 2: capture each section between its heading and end marker
fn capture_sections(raw: &str, lang: Lang) -> Option<NarrativeReview> {
    let (process_re, issues_re) = match lang {
        Lang::Zh => (zh_process_regex(), zh_issues_regex()),
        Lang::En => (en_process_regex(), en_issues_regex()),
    };
    let process = process_re.captures(raw)?.get(1)?.as_str();
    let issues = issues_re.captures(raw)?.get(1)?.as_str();
    Some(NarrativeReview {
        process: process.to_string(),
        issues: issues.to_string(),
    })
}

/// Strategy 3: split once on the issues heading only
fn split_on_issues_heading(raw: &str, m: &Markers) -> Option<NarrativeReview> {
    let (before, after) = raw.split_once(m.issues_heading)?;
    let issues = after
        .trim_start_matches([':', '：'])
        .trim()
        .trim_end_matches(m.issues_end)
        .trim();
    Some(NarrativeReview {
        process: strip_heading(before, m.process_heading),
        issues: issues.to_string(),
    })
}

/// Strategy 4: scan for issue statements matching the fixed template
fn scan_issue_statements(raw: &str, lang: Lang) -> Option<NarrativeReview> {
    let re = match lang {
        Lang::Zh => zh_issue_statement_regex(),
        Lang::En => en_issue_statement_regex(),
    };
    let mut statements = Vec::new();
    let mut first_start = None;
    for found in re.find_iter(raw) {
        first_start.get_or_insert(found.start());
        statements.push(found.as_str());
    }
    let first_start = first_start?;
    Some(NarrativeReview {
        process: raw[..first_start].trim().to_string(),
        issues: statements.join("\n"),
    })
}

/// Drop a leading section heading with its optional colon
fn strip_heading(text: &str, heading: &str) -> String {
    let trimmed = text.trim();
    match trimmed.strip_prefix(heading) {
        Some(rest) => rest.trim_start_matches([':', '：']).trim().to_string(),
        None => trimmed.to_string(),
    }
}
