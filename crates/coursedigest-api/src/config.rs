use config::{Config as ConfigLoader, ConfigError, Environment, File};
use coursedigest_pipeline::{
    ModelPool, PipelineConfig, ProviderType, RedditCredentials, RetryPolicy, ServiceConfig,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub log: LoggingConfig,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub cache: CacheConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub secrets: Secrets,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whole-request budget; a cold run makes many sequential LLM calls
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    #[serde(default)]
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub subreddit: String,
    pub search_limit: usize,
    pub fetch_concurrency: usize,
    pub max_comments: usize,
    pub select_count: usize,
    pub batch_size: usize,
    pub main_summary_posts: usize,
    pub temperature: f32,
    pub throttle_ms: u64,
    pub retry_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_jitter_ms: u64,
    pub provider: ProviderType,
    pub base_url: Option<String>,
    pub preferred_models: Vec<String>,
    pub models: Vec<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        let defaults = PipelineConfig::default();
        Self {
            subreddit: defaults.subreddit,
            search_limit: defaults.search_limit,
            fetch_concurrency: defaults.fetch_concurrency,
            max_comments: defaults.max_comments,
            select_count: defaults.select_count,
            batch_size: defaults.batch_size,
            main_summary_posts: defaults.main_summary_posts,
            temperature: defaults.temperature,
            throttle_ms: defaults.throttle.as_millis() as u64,
            retry_attempts: defaults.retry.max_attempts,
            retry_base_delay_ms: defaults.retry.base_delay.as_millis() as u64,
            retry_max_jitter_ms: defaults.retry.max_jitter.as_millis() as u64,
            provider: defaults.provider,
            base_url: defaults.llm_base_url,
            preferred_models: defaults.models.preferred,
            models: defaults.models.all,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub directory: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("cache"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Secrets {
    pub serpapi_key: Option<String>,
    pub llm_api_key: Option<String>,
    pub reddit: Option<RedditCredentials>,
}

impl Secrets {
    /// Read API keys from the process environment. Missing keys are not an
    /// error; the matching pipeline stage is disabled instead.
    pub fn from_env() -> Self {
        let reddit = match (env_secret("REDDIT_CLIENT_ID"), env_secret("REDDIT_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(RedditCredentials {
                client_id,
                client_secret,
                user_agent: env_secret("REDDIT_USER_AGENT").unwrap_or_else(|| "coursedigest/0.1".to_string()),
            }),
            _ => None,
        };

        Self {
            serpapi_key: env_secret("SERPAPI_KEY"),
            llm_api_key: env_secret("GROQ_API_KEY").or_else(|| env_secret("LLM_API_KEY")),
            reddit,
        }
    }
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// SECTION__KEY maps to section.key; a single `_` stays inside the key name
fn env_section(prefix: &str) -> Environment {
    Environment::with_prefix(prefix)
        .prefix_separator("__")
        .separator("__")
        .keep_prefix(true)
        .try_parsing(true)
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER__, LOG__, PIPELINE__, CACHE__ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(env_section("SERVER"))
            .add_source(env_section("CORS"))
            .add_source(env_section("LOG"))
            .add_source(env_section("PIPELINE"))
            .add_source(env_section("CACHE"));

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.secrets = Secrets::from_env();

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));
        builder.build()?.try_deserialize()
    }

    pub fn with_secrets(mut self, secrets: Secrets) -> Self {
        self.secrets = secrets;
        self
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        let p = &self.pipeline;
        let models = if p.models.is_empty() && p.preferred_models.is_empty() {
            ModelPool::default()
        } else {
            ModelPool::new(p.preferred_models.clone(), p.models.clone())
        };

        PipelineConfig {
            services: ServiceConfig {
                search_api_key: self.secrets.serpapi_key.clone(),
                llm_api_key: self.secrets.llm_api_key.clone(),
                reddit: self.secrets.reddit.clone(),
                cache_directory: self.cache.directory.clone(),
            },
            subreddit: p.subreddit.clone(),
            search_limit: p.search_limit,
            fetch_concurrency: p.fetch_concurrency,
            max_comments: p.max_comments,
            select_count: p.select_count,
            batch_size: p.batch_size,
            main_summary_posts: p.main_summary_posts,
            temperature: p.temperature,
            throttle: Duration::from_millis(p.throttle_ms),
            retry: RetryPolicy::new(
                p.retry_attempts,
                Duration::from_millis(p.retry_base_delay_ms),
                Duration::from_millis(p.retry_max_jitter_ms),
            ),
            models,
            provider: p.provider,
            llm_base_url: p.base_url.clone(),
        }
    }
}
