use coursedigest_cache::{load, store, CacheKey, CacheStore};
use coursedigest_llm::{ChatClient, ChatOptions, ChatRequest, ModelPool, ModelPreference};
use std::sync::Arc;

use crate::error::SummarizeError;
use crate::retry::{with_retry, RetryPolicy};

/// Cached, retried access to the completions endpoint
pub struct Summarizer {
    client: Arc<dyn ChatClient>,
    cache: Arc<dyn CacheStore>,
    models: ModelPool,
    retry: RetryPolicy,
    options: ChatOptions,
}

impl Summarizer {
    pub fn new(
        client: Arc<dyn ChatClient>,
        cache: Arc<dyn CacheStore>,
        models: ModelPool,
        retry: RetryPolicy,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            cache,
            models,
            retry,
            options: ChatOptions::new().temperature(temperature),
        }
    }

    pub fn cache(&self) -> &dyn CacheStore {
        self.cache.as_ref()
    }

    pub fn pick_model(&self, preference: ModelPreference) -> String {
        self.models.pick(preference)
    }

    /// Completion text for `prompt` on `model`, served from cache when possible.
    ///
    /// Only successful completions are cached.
    pub async fn complete(&self, prompt: &str, model: &str) -> Result<String, SummarizeError> {
        let key = CacheKey::new("completion", [prompt, model]);
        if let Some(text) = load::<String>(self.cache(), &key).await {
            tracing::debug!(model = model, "Completion served from cache");
            return Ok(text);
        }

        let text = self.generate(prompt, model).await?;
        store(self.cache(), &key, &text).await;
        Ok(text)
    }

    /// Retried completion that bypasses the completion cache. For callers
    /// that cache their own parsed result and must not replay a reply they
    /// rejected.
    pub async fn generate(&self, prompt: &str, model: &str) -> Result<String, SummarizeError> {
        let response = with_retry(&self.retry, model, || {
            let client = Arc::clone(&self.client);
            let request = ChatRequest::prompt(model, prompt).with_options(self.options.clone());
            async move { client.chat(request).await }
        })
        .await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %response.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Completion received"
            );
        }

        Ok(response.content)
    }

    /// Draw a model for this call, then complete
    pub async fn complete_with(&self, prompt: &str, preference: ModelPreference) -> Result<String, SummarizeError> {
        let model = self.pick_model(preference);
        self.complete(prompt, &model).await
    }

    /// Draw a model for this call, then generate without the completion cache
    pub async fn generate_with(&self, prompt: &str, preference: ModelPreference) -> Result<String, SummarizeError> {
        let model = self.pick_model(preference);
        self.generate(prompt, &model).await
    }

    /// Completion text, or a descriptive error string in its place
    pub async fn summarize_one(&self, prompt: &str, model: &str) -> String {
        match self.complete(prompt, model).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(model = model, error = %e, "Summarization failed");
                e.to_string()
            }
        }
    }
}
