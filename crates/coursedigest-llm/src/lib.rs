pub mod types;
pub mod traits;
pub mod error;
pub mod models;
pub mod config;
pub mod openai;

pub use traits::{ChatClient, ChatRequest, ChatResponse, ChatOptions, TokenUsage};
pub use error::{LlmError, Result};
pub use models::{ModelPool, ModelPreference};
pub use config::{ClientFactory, ProviderConfig, ProviderType};
pub use openai::CompletionsClient;
pub use types::Message;
