use coursedigest_llm::{ModelPool, ProviderType};
use coursedigest_sources::RedditCredentials;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Credentials and storage location for the external services.
///
/// Every credential is optional: a missing one is detected when the pipeline
/// is built and degrades that stage to a placeholder result.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub search_api_key: Option<String>,
    pub llm_api_key: Option<String>,
    pub reddit: Option<RedditCredentials>,
    pub cache_directory: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            search_api_key: None,
            llm_api_key: None,
            reddit: None,
            cache_directory: PathBuf::from("cache"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub services: ServiceConfig,
    /// Subreddit the search is scoped to
    pub subreddit: String,
    pub search_limit: usize,
    pub fetch_concurrency: usize,
    /// Top-level comments kept per thread
    pub max_comments: usize,
    /// Threads kept by the relevance selector
    pub select_count: usize,
    pub batch_size: usize,
    /// Threads fed into the overall summary
    pub main_summary_posts: usize,
    pub temperature: f32,
    /// Fixed pause between sequential LLM calls
    pub throttle: Duration,
    pub retry: RetryPolicy,
    pub models: ModelPool,
    pub provider: ProviderType,
    pub llm_base_url: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            services: ServiceConfig::default(),
            subreddit: "UWMadison".to_string(),
            search_limit: 25,
            fetch_concurrency: 8,
            max_comments: 3,
            select_count: 8,
            batch_size: 3,
            main_summary_posts: 3,
            temperature: 0.7,
            throttle: Duration::from_secs(1),
            retry: RetryPolicy::default(),
            models: ModelPool::default(),
            provider: ProviderType::default(),
            llm_base_url: None,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(mut self, services: ServiceConfig) -> Self {
        self.services = services;
        self
    }

    pub fn with_subreddit(mut self, subreddit: impl Into<String>) -> Self {
        self.subreddit = subreddit.into();
        self
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn with_select_count(mut self, count: usize) -> Self {
        self.select_count = count;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_models(mut self, models: ModelPool) -> Self {
        self.models = models;
        self
    }

    pub fn with_cache_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.services.cache_directory = dir.into();
        self
    }
}
