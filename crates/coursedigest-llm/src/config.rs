// Configuration layer for provider-agnostic LLM client creation

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Type of LLM provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    Groq,
    OpenAI,
}

impl ProviderType {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderType::Groq => GROQ_API_BASE,
            ProviderType::OpenAI => OPENAI_API_BASE,
        }
    }
}

/// Complete provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderType,
    pub api_key: String,
    /// Overrides the provider's default base URL (proxies, local mocks)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    45
}

impl ProviderConfig {
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderType::Groq,
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderType::OpenAI,
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_chat_client(config: ProviderConfig) -> Result<Arc<dyn crate::traits::ChatClient>> {
        let client = crate::openai::CompletionsClient::from_config(&config)?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_config() {
        let config = ProviderConfig::groq("test-key");
        assert_eq!(config.provider, ProviderType::Groq);
        assert_eq!(config.base_url(), GROQ_API_BASE);
    }

    #[test]
    fn test_base_url_override() {
        let config = ProviderConfig::openai("test-key").with_base_url("http://localhost:9999");
        assert_eq!(config.base_url(), "http://localhost:9999");
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = ProviderConfig::groq("test-key").with_timeout_secs(10);

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ProviderConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.provider, ProviderType::Groq);
        assert_eq!(deserialized.timeout_secs, 10);
    }

    #[test]
    fn test_factory_rejects_unusable_key() {
        assert!(ClientFactory::create_chat_client(ProviderConfig::groq("bad\nkey")).is_err());
    }
}
