use coursedigest_cache::{load, store, CacheKey};
use coursedigest_llm::ModelPreference;
use coursedigest_sources::Thread;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

use crate::prompts::build_batch_prompt;
use crate::summarizer::Summarizer;

pub const NO_SUMMARY: &str = "No summary available.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub url: String,
    pub title: String,
    pub summary: String,
}

/// Summarizes threads a group at a time with one completion per group
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    batch_size: usize,
    throttle: Duration,
}

impl BatchOrchestrator {
    pub fn new(batch_size: usize, throttle: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            throttle,
        }
    }

    /// Per-thread summaries in input order
    pub async fn summarize(&self, summarizer: &Summarizer, threads: &[Thread], query: &str) -> Vec<PostSummary> {
        let mut results = Vec::with_capacity(threads.len());
        let mut called = false;

        for (group_idx, group) in threads.chunks(self.batch_size).enumerate() {
            let keys: Vec<CacheKey> = group
                .iter()
                .map(|t| CacheKey::new("post_summary", [t.url.as_str(), query]))
                .collect();

            let mut cached = Vec::with_capacity(group.len());
            for key in &keys {
                cached.push(load::<String>(summarizer.cache(), key).await);
            }

            if cached.iter().all(Option::is_some) {
                tracing::debug!(group = group_idx, size = group.len(), "Batch served from cache");
                results.extend(
                    group
                        .iter()
                        .zip(cached.into_iter().flatten())
                        .map(|(t, summary)| post_summary(t, summary)),
                );
                continue;
            }

            if called && !self.throttle.is_zero() {
                tokio::time::sleep(self.throttle).await;
            }
            called = true;

            let prompt = build_batch_prompt(query, group);
            let sections = match summarizer.generate_with(&prompt, ModelPreference::Preferred).await {
                Ok(text) => split_batch_response(&text, group.len()),
                Err(e) => {
                    tracing::warn!(group = group_idx, error = %e, "Batch summarization failed");
                    vec![None; group.len()]
                }
            };

            let recovered = sections.iter().filter(|s| s.is_some()).count();
            tracing::info!(group = group_idx, size = group.len(), recovered = recovered, "Batch summarized");

            for ((thread, key), section) in group.iter().zip(&keys).zip(sections) {
                match section {
                    Some(summary) => {
                        store(summarizer.cache(), key, &summary).await;
                        results.push(post_summary(thread, summary));
                    }
                    None => results.push(post_summary(thread, NO_SUMMARY.to_string())),
                }
            }
        }

        results
    }
}

fn post_summary(thread: &Thread, summary: String) -> PostSummary {
    PostSummary {
        url: thread.url.clone(),
        title: thread.title.clone(),
        summary,
    }
}

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?i)^[\s*#>_\-]*post\s*#?\s*(\d+)[\s*_]*[:.)\-]?[\s*_]*(.*)$").expect("static regex")
    })
}

/// Split a `POST n:` formatted response into `group_len` sections.
///
/// Markers are 1-based. Lines after a marker belong to it until the next
/// marker; text before the first marker and markers outside the group are
/// ignored. Missing or blank sections are `None`.
pub fn split_batch_response(text: &str, group_len: usize) -> Vec<Option<String>> {
    let mut sections: Vec<Vec<&str>> = vec![Vec::new(); group_len];
    let mut seen = vec![false; group_len];
    let mut current: Option<usize> = None;

    for line in text.lines() {
        if let Some(caps) = marker_regex().captures(line) {
            let number = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok());
            current = match number {
                Some(n) if (1..=group_len).contains(&n) => Some(n - 1),
                _ => None,
            };
            if let Some(idx) = current {
                seen[idx] = true;
                if let Some(rest) = caps.get(2) {
                    sections[idx].push(rest.as_str());
                }
            }
            continue;
        }
        if let Some(idx) = current {
            sections[idx].push(line);
        }
    }

    sections
        .into_iter()
        .zip(seen)
        .map(|(lines, seen)| {
            let text = lines.join("\n").trim().to_string();
            (seen && !text.is_empty()).then_some(text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_markers() {
        let text = "POST 1: Heavy workload.\nPOST 2: Great professor.\nPOST 3: Curve helps.";
        assert_eq!(
            split_batch_response(text, 3),
            vec![
                Some("Heavy workload.".to_string()),
                Some("Great professor.".to_string()),
                Some("Curve helps.".to_string()),
            ]
        );
    }

    #[test]
    fn test_trailing_lines_attach_to_last_marker() {
        let text = "Here you go:\nPOST 1:\nFirst line.\nSecond line.\n\nPOST 2: Short.";
        let sections = split_batch_response(text, 2);
        assert_eq!(sections[0].as_deref(), Some("First line.\nSecond line."));
        assert_eq!(sections[1].as_deref(), Some("Short."));
    }

    #[test]
    fn test_decorated_markers() {
        let text = "**POST 1:** Tough exams.\n## Post 2 - Fair grading.\n- post #3) Lots of proofs.";
        let sections = split_batch_response(text, 3);
        assert_eq!(sections[0].as_deref(), Some("Tough exams."));
        assert_eq!(sections[1].as_deref(), Some("Fair grading."));
        assert_eq!(sections[2].as_deref(), Some("Lots of proofs."));
    }

    #[test]
    fn test_missing_and_out_of_range_markers() {
        let text = "POST 1: Only one.\nPOST 7: Stray.\nstill stray";
        let sections = split_batch_response(text, 3);
        assert_eq!(sections[0].as_deref(), Some("Only one."));
        assert_eq!(sections[1], None);
        assert_eq!(sections[2], None);
    }

    #[test]
    fn test_blank_section_is_missing() {
        let sections = split_batch_response("POST 1:\n\nPOST 2: ok", 2);
        assert_eq!(sections[0], None);
        assert_eq!(sections[1].as_deref(), Some("ok"));
    }
}
