use serde::{Deserialize, Serialize};

/// Chat message sent to a completions endpoint. Every request is a single
/// user turn, so that is the only role carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    #[serde(rename = "user")]
    Human { content: String },
}

impl Message {
    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    pub fn role(&self) -> &str {
        match self {
            Self::Human { .. } => "user",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Human { content } => content,
        }
    }
}
