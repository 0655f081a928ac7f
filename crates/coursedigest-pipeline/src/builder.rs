use anyhow::{Context, Result};
use std::sync::Arc;

use coursedigest_cache::{CacheStore, DiskCache};
use coursedigest_llm::{ChatClient, ClientFactory, ProviderConfig};
use coursedigest_sources::{RedditClient, SearchProvider, SerpApiProvider, ThreadSource};

use crate::cached_source::CachedThreadSource;
use crate::config::PipelineConfig;
use crate::pipeline::CoursePipeline;
use crate::summarizer::Summarizer;

/// Builder for a [`CoursePipeline`].
///
/// Collaborators that are not injected are created from the config. A missing
/// search or LLM key leaves that stage disabled instead of failing the build.
pub struct PipelineBuilder {
    config: PipelineConfig,
    search: Option<Arc<dyn SearchProvider>>,
    source: Option<Arc<dyn ThreadSource>>,
    chat_client: Option<Arc<dyn ChatClient>>,
    cache: Option<Arc<dyn CacheStore>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            search: None,
            source: None,
            chat_client: None,
            cache: None,
        }
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn search_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(provider);
        self
    }

    pub fn thread_source(mut self, source: Arc<dyn ThreadSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn chat_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.chat_client = Some(client);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<CoursePipeline> {
        let config = self.config;

        let cache: Arc<dyn CacheStore> = match self.cache {
            Some(cache) => cache,
            None => Arc::new(DiskCache::new(config.services.cache_directory.clone())),
        };

        let search: Option<Arc<dyn SearchProvider>> = match (self.search, non_empty(&config.services.search_api_key)) {
            (Some(provider), _) => Some(provider),
            (None, Some(key)) => Some(Arc::new(
                SerpApiProvider::new(key, &config.subreddit).context("Failed to create search client")?,
            )),
            (None, None) => {
                tracing::warn!("SERPAPI_KEY not set, search disabled");
                None
            }
        };

        let inner: Arc<dyn ThreadSource> = match self.source {
            Some(source) => source,
            None => Arc::new(
                RedditClient::new(config.services.reddit.clone())
                    .context("Failed to create Reddit client")?
                    .with_max_comments(config.max_comments),
            ),
        };
        let source = Arc::new(CachedThreadSource::new(inner, Arc::clone(&cache)));

        let chat_client = match (self.chat_client, non_empty(&config.services.llm_api_key)) {
            (Some(client), _) => Some(client),
            (None, Some(key)) => {
                let mut provider = ProviderConfig::groq(key);
                provider.provider = config.provider;
                if let Some(base_url) = &config.llm_base_url {
                    provider = provider.with_base_url(base_url);
                }
                Some(ClientFactory::create_chat_client(provider).context("Failed to create LLM client")?)
            }
            (None, None) => {
                tracing::warn!("LLM API key not set, summaries disabled");
                None
            }
        };

        let summarizer = chat_client.map(|client| {
            Summarizer::new(
                client,
                Arc::clone(&cache),
                config.models.clone(),
                config.retry.clone(),
                config.temperature,
            )
        });

        Ok(CoursePipeline::new(config, search, source, cache, summarizer))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
