use serde::{Deserialize, Serialize};

/// A discussion post plus its top-level comments. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    /// Source URL, also the thread's identity
    pub url: String,
    pub title: String,
    pub body: String,
    /// Top-level comment bodies in display order
    pub comments: Vec<String>,
}

impl Thread {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        comments: Vec<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            body: body.into(),
            comments,
        }
    }

    /// Placeholder for a failed fetch
    pub fn empty(url: impl Into<String>) -> Self {
        Self::new(url, "", "", Vec::new())
    }

    /// Failed fetches are recognised by their empty title
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
    }

    /// Body truncated to at most `max_chars` characters
    pub fn body_excerpt(&self, max_chars: usize) -> &str {
        truncate_chars(&self.body, max_chars)
    }
}

/// Char-boundary-safe prefix of `s`
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
