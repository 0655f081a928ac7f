use coursedigest_llm::LlmError;
use thiserror::Error;

/// Failure of one LLM completion after the retry policy ran its course.
///
/// The `Display` text is shown to end users as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SummarizeError {
    #[error("LLM request failed after multiple retries ({attempts} attempts): {last}")]
    RetriesExhausted { attempts: u32, last: LlmError },

    #[error("LLM request failed: {0}")]
    Fatal(LlmError),
}

impl SummarizeError {
    pub fn attempts(&self) -> u32 {
        match self {
            SummarizeError::RetriesExhausted { attempts, .. } => *attempts,
            SummarizeError::Fatal(_) => 1,
        }
    }
}
