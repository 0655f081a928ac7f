//! Web search restricted to one subreddit.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

use crate::error::{Result, SourceError};

const SERPAPI_URL: &str = "https://serpapi.com/search";

/// Search backend returning candidate thread URLs in rank order
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>>;

    fn name(&self) -> &'static str;
}

/// SerpAPI (Google engine) provider
pub struct SerpApiProvider {
    api_key: String,
    scope: String,
    endpoint: String,
    client: Client,
}

impl SerpApiProvider {
    /// # Arguments
    /// * `api_key` - SerpAPI key
    /// * `subreddit` - only links under `reddit.com/r/{subreddit}` are kept
    pub fn new(api_key: impl Into<String>, subreddit: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            api_key: api_key.into(),
            scope: format!("reddit.com/r/{}", subreddit),
            endpoint: SERPAPI_URL.to_string(),
            client,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        if self.api_key.is_empty() {
            return Err(SourceError::MissingCredentials("serpapi".to_string()));
        }

        let num = limit.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                service: "serpapi".to_string(),
                status: status.as_u16(),
            });
        }

        let data: SerpApiResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("SerpAPI JSON parse error: {}", e)))?;

        let links = data.organic_results.into_iter().filter_map(|r| r.link);
        Ok(filter_links(links, &self.scope, limit))
    }

    fn name(&self) -> &'static str {
        "serpapi"
    }
}

/// Keep in-scope http(s) links, drop query strings, dedupe preserving rank, truncate
pub fn filter_links<I>(links: I, scope: &str, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| is_web_link(link) && link.contains(scope))
        .map(|link| match link.split_once('?') {
            Some((base, _)) => base.to_string(),
            None => link,
        })
        .filter(|link| seen.insert(link.clone()))
        .take(limit)
        .collect()
}

fn is_web_link(link: &str) -> bool {
    let lower = link.trim_start().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    link: Option<String>,
}
