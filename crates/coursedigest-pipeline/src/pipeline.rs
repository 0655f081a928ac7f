use coursedigest_cache::{load, store, CacheKey, CacheStore};
use coursedigest_llm::ModelPreference;
use coursedigest_sources::{fetch_threads, optimize_search_query, SearchProvider, Thread, ThreadSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::batch::{BatchOrchestrator, PostSummary};
use crate::config::PipelineConfig;
use crate::parse::StructuredSummary;
use crate::prompts::build_main_prompt;
use crate::selector::RelevanceSelector;
use crate::summarizer::Summarizer;

pub const MISSING_LLM_KEY: &str = "Missing LLM API key";
pub const NO_DISCUSSIONS: &str = "No Reddit discussions found for this course.";

/// Everything one run produced for a course query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseReport {
    pub query: String,
    /// Query actually sent to the search provider
    pub search_query: String,
    pub summary: StructuredSummary,
    pub posts: Vec<PostSummary>,
    /// URLs of the threads the report is based on
    pub sources: Vec<String>,
}

/// Search, fetch, select and summarize for one course query at a time.
///
/// Built by [`crate::PipelineBuilder`]. A pipeline without a search provider
/// finds nothing; one without a summarizer reports [`MISSING_LLM_KEY`].
pub struct CoursePipeline {
    config: PipelineConfig,
    search: Option<Arc<dyn SearchProvider>>,
    source: Arc<dyn ThreadSource>,
    cache: Arc<dyn CacheStore>,
    summarizer: Option<Summarizer>,
    selector: RelevanceSelector,
    batcher: BatchOrchestrator,
}

impl CoursePipeline {
    pub(crate) fn new(
        config: PipelineConfig,
        search: Option<Arc<dyn SearchProvider>>,
        source: Arc<dyn ThreadSource>,
        cache: Arc<dyn CacheStore>,
        summarizer: Option<Summarizer>,
    ) -> Self {
        let batcher = BatchOrchestrator::new(config.batch_size, config.throttle);
        Self {
            config,
            search,
            source,
            cache,
            summarizer,
            selector: RelevanceSelector::new(),
            batcher,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn has_llm(&self) -> bool {
        self.summarizer.is_some()
    }

    pub async fn run(&self, query: &str) -> CourseReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("course_digest", run_id = %run_id, query = %query);
        self.run_inner(query.trim()).instrument(span).await
    }

    async fn run_inner(&self, query: &str) -> CourseReport {
        let search_query = optimize_search_query(query, &self.config.subreddit);
        let urls = self.search_urls(&search_query).await;
        let threads = self.fetch(&urls).await;
        tracing::info!(urls = urls.len(), threads = threads.len(), "Fetched threads");

        let Some(summarizer) = &self.summarizer else {
            tracing::warn!("No LLM API key configured, skipping summaries");
            let sources = threads
                .iter()
                .take(self.config.select_count)
                .map(|t| t.url.clone())
                .collect();
            return CourseReport {
                query: query.to_string(),
                search_query,
                summary: StructuredSummary::unavailable(MISSING_LLM_KEY),
                posts: Vec::new(),
                sources,
            };
        };

        if threads.is_empty() {
            return CourseReport {
                query: query.to_string(),
                search_query,
                summary: StructuredSummary::unavailable(NO_DISCUSSIONS),
                posts: Vec::new(),
                sources: Vec::new(),
            };
        }

        let selected = self
            .selector
            .select(summarizer, threads, query, self.config.select_count)
            .await;

        let summary = self.main_summary(summarizer, query, &selected).await;
        if !self.config.throttle.is_zero() {
            tokio::time::sleep(self.config.throttle).await;
        }
        let posts = self.batcher.summarize(summarizer, &selected, query).await;

        CourseReport {
            query: query.to_string(),
            search_query,
            summary,
            posts,
            sources: selected.into_iter().map(|t| t.url).collect(),
        }
    }

    async fn search_urls(&self, search_query: &str) -> Vec<String> {
        let Some(provider) = &self.search else {
            tracing::warn!("No search API key configured, skipping search");
            return Vec::new();
        };

        let key = CacheKey::new("search", [search_query]);
        if let Some(urls) = load::<Vec<String>>(self.cache.as_ref(), &key).await {
            return urls;
        }

        match provider.search(search_query, self.config.search_limit).await {
            Ok(urls) => {
                if !urls.is_empty() {
                    store(self.cache.as_ref(), &key, &urls).await;
                }
                urls
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "Search failed");
                Vec::new()
            }
        }
    }

    /// Non-empty threads in search rank order
    async fn fetch(&self, urls: &[String]) -> Vec<Thread> {
        let mut threads: Vec<Thread> = fetch_threads(Arc::clone(&self.source), urls, self.config.fetch_concurrency)
            .await
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect();
        threads.sort_by_key(|t| urls.iter().position(|u| *u == t.url).unwrap_or(usize::MAX));
        threads
    }

    async fn main_summary(&self, summarizer: &Summarizer, query: &str, threads: &[Thread]) -> StructuredSummary {
        let top = &threads[..threads.len().min(self.config.main_summary_posts)];
        let key = CacheKey::new(
            "summary",
            std::iter::once(query).chain(top.iter().map(|t| t.url.as_str())),
        );
        if let Some(summary) = load::<StructuredSummary>(self.cache.as_ref(), &key).await {
            return summary;
        }

        let prompt = build_main_prompt(query, top);
        match summarizer.generate_with(&prompt, ModelPreference::Any).await {
            Ok(text) => {
                let summary = StructuredSummary::parse(&text);
                if summary.is_parsed() {
                    store(self.cache.as_ref(), &key, &summary).await;
                } else {
                    tracing::warn!("Main summary could not be parsed");
                }
                summary
            }
            Err(e) => StructuredSummary::unavailable(e.to_string()),
        }
    }
}
