pub mod config;
pub mod error;
pub mod retry;
pub mod parse;
pub mod prompts;
pub mod summarizer;
pub mod selector;
pub mod batch;
pub mod cached_source;
pub mod pipeline;
pub mod builder;

pub use config::{PipelineConfig, ServiceConfig};
pub use error::SummarizeError;
pub use retry::{with_retry, RetryPolicy};
pub use parse::{ParseStatus, StructuredSummary, NO_ESTIMATE, UNPARSEABLE_SUMMARY};
pub use summarizer::Summarizer;
pub use selector::{backfill, parse_indices, RelevanceSelector};
pub use batch::{split_batch_response, BatchOrchestrator, PostSummary, NO_SUMMARY};
pub use cached_source::CachedThreadSource;
pub use pipeline::{CoursePipeline, CourseReport, MISSING_LLM_KEY, NO_DISCUSSIONS};
pub use builder::PipelineBuilder;

// Re-export collaborator types so callers need a single dependency
pub use coursedigest_cache::{CacheStore, DiskCache, MemoryCache};
pub use coursedigest_llm::{ModelPool, ModelPreference, ProviderType};
pub use coursedigest_sources::{RedditCredentials, Thread};
