//! Line-oriented extraction of narrative, tags and grade estimate from free text.
//!
//! Models follow the requested format loosely, so nothing here can fail: the
//! worst case is an empty narrative replaced by [`UNPARSEABLE_SUMMARY`].

use serde::{Deserialize, Serialize};

pub const UNPARSEABLE_SUMMARY: &str =
    "Summary could not be parsed. The model may have returned unexpected formatting.";
pub const NO_ESTIMATE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    Parsed,
    /// The model answered but no narrative could be recovered
    Unparseable,
    /// No model output at all (missing key, request failure); narrative holds the reason
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredSummary {
    /// Markdown narrative
    pub narrative: String,
    pub tags: Vec<String>,
    /// Estimated chance of an A, e.g. `70%`
    pub estimate: String,
    pub status: ParseStatus,
}

impl StructuredSummary {
    pub fn parse(text: &str) -> Self {
        let mut narrative = Vec::new();
        let mut tags = Vec::new();
        let mut estimate = NO_ESTIMATE.to_string();

        for line in text.lines() {
            let stripped = strip_decoration(line);
            let lower = stripped.to_lowercase();

            if lower.starts_with("tags") {
                let rest = match stripped.split_once(':') {
                    Some((_, rest)) => rest,
                    None => stripped.get(4..).unwrap_or_default(),
                };
                tags = parse_tags(rest);
            } else if lower.contains("chance") {
                match stripped.split_once(':') {
                    Some((_, rest)) => estimate = clean_value(rest).to_string(),
                    None => narrative.push(line),
                }
            } else {
                narrative.push(line);
            }
        }

        let narrative = narrative.join("\n").trim().to_string();
        if narrative.is_empty() {
            return Self {
                narrative: UNPARSEABLE_SUMMARY.to_string(),
                tags,
                estimate,
                status: ParseStatus::Unparseable,
            };
        }

        Self {
            narrative,
            tags,
            estimate,
            status: ParseStatus::Parsed,
        }
    }

    /// Placeholder carrying a user-visible reason
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            narrative: reason.into(),
            tags: Vec::new(),
            estimate: NO_ESTIMATE.to_string(),
            status: ParseStatus::Unavailable,
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.status == ParseStatus::Parsed
    }
}

// Bullets, headings and bold markers in front of a label
fn strip_decoration(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '*' | '-' | '#' | '>' | '_') || c.is_whitespace())
}

fn clean_value(value: &str) -> &str {
    value.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace())
}

fn parse_tags(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(|t| t.trim_matches(|c: char| matches!(c, '[' | ']' | '*' | '_') || c.is_whitespace()))
        .map(|t| match t.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("tags:") => t[5..].trim(),
            _ => t,
        })
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
