use coursedigest_llm::ModelPreference;
use coursedigest_sources::Thread;

use crate::prompts::build_selection_prompt;
use crate::summarizer::Summarizer;

/// Asks the model which threads matter most for a course query.
///
/// The returned order is the order the model listed indices in, followed by
/// the lowest unselected indices when the model returned too few.
#[derive(Debug, Clone, Default)]
pub struct RelevanceSelector;

impl RelevanceSelector {
    pub fn new() -> Self {
        Self
    }

    pub async fn select(
        &self,
        summarizer: &Summarizer,
        threads: Vec<Thread>,
        query: &str,
        count: usize,
    ) -> Vec<Thread> {
        if threads.len() <= count {
            return threads;
        }

        let prompt = build_selection_prompt(query, &threads, count);
        let picked = match summarizer.complete_with(&prompt, ModelPreference::Preferred).await {
            Ok(text) => parse_indices(&text, threads.len()),
            Err(e) => {
                tracing::warn!(error = %e, "Relevance selection failed, keeping input order");
                Vec::new()
            }
        };

        let model_picks = picked.len().min(count);
        let order = backfill(picked, threads.len(), count);
        tracing::info!(
            candidates = threads.len(),
            model_picks = model_picks,
            selected = order.len(),
            "Selected relevant threads"
        );

        let mut slots: Vec<Option<Thread>> = threads.into_iter().map(Some).collect();
        order.into_iter().filter_map(|idx| slots[idx].take()).collect()
    }
}

/// Comma-separated 0-based indices from free text.
///
/// Non-numeric tokens, out-of-range indices and repeats are dropped.
pub fn parse_indices(text: &str, len: usize) -> Vec<usize> {
    let mut indices = Vec::new();
    for token in text.split(|c: char| c == ',' || c == '\n') {
        let token = token.trim_matches(|c: char| matches!(c, '[' | ']' | '(' | ')' | '.' | '*') || c.is_whitespace());
        match token.parse::<usize>() {
            Ok(idx) if idx < len && !indices.contains(&idx) => indices.push(idx),
            _ => {}
        }
    }
    indices
}

/// Drop repeats and indices outside `len`, truncate to `count`, then fill
/// with the lowest unused indices below `len`
pub fn backfill(picks: Vec<usize>, len: usize, count: usize) -> Vec<usize> {
    let mut selected: Vec<usize> = Vec::with_capacity(count.min(len));
    for idx in picks {
        if idx < len && !selected.contains(&idx) {
            selected.push(idx);
        }
    }
    selected.truncate(count);
    let target = count.min(len);
    let mut next = 0;
    while selected.len() < target {
        if !selected.contains(&next) {
            selected.push(next);
        }
        next += 1;
    }
    selected
}
