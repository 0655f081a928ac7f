//! Reddit thread retrieval through the public `.json` listing endpoint.
//!
//! Without credentials the listing is fetched anonymously from the thread's
//! own URL. With app credentials an application-only OAuth token is obtained
//! and requests go to `oauth.reddit.com`, which has far friendlier limits.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::error::{Result, SourceError};
use crate::types::Thread;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const OAUTH_BASE: &str = "https://oauth.reddit.com";
const DEFAULT_USER_AGENT: &str = "coursedigest/0.1";

/// Content service boundary: URL in, thread out. Never fails; a failed
/// fetch is an empty-title [`Thread`].
#[async_trait]
pub trait ThreadSource: Send + Sync {
    async fn fetch_thread(&self, url: &str) -> Thread;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

#[derive(Debug)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

pub struct RedditClient {
    client: Client,
    user_agent: String,
    credentials: Option<RedditCredentials>,
    token: Mutex<Option<AccessToken>>,
    max_comments: usize,
    token_url: String,
    oauth_base: String,
}

impl RedditClient {
    pub fn new(credentials: Option<RedditCredentials>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        let user_agent = credentials
            .as_ref()
            .map(|c| c.user_agent.clone())
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            client,
            user_agent,
            credentials,
            token: Mutex::new(None),
            max_comments: 3,
            token_url: TOKEN_URL.to_string(),
            oauth_base: OAUTH_BASE.to_string(),
        })
    }

    /// Number of top-level comments kept per thread
    pub fn with_max_comments(mut self, max_comments: usize) -> Self {
        self.max_comments = max_comments;
        self
    }

    /// Point OAuth traffic somewhere else (tests, proxies)
    pub fn with_endpoints(mut self, token_url: impl Into<String>, oauth_base: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self.oauth_base = oauth_base.into();
        self
    }

    async fn try_fetch(&self, url: &str) -> Result<Thread> {
        let request = match &self.credentials {
            Some(creds) => {
                let token = self.access_token(creds).await?;
                let path = Url::parse(url)
                    .map_err(|e| SourceError::Parse(format!("Invalid thread URL {}: {}", url, e)))?
                    .path()
                    .trim_end_matches('/')
                    .to_string();
                self.client
                    .get(format!("{}{}.json", self.oauth_base, path))
                    .bearer_auth(token)
            }
            None => self.client.get(format!("{}.json", url.trim_end_matches('/'))),
        };

        let response = request
            .header(USER_AGENT, &self.user_agent)
            .query(&[("raw_json", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                service: "reddit".to_string(),
                status: status.as_u16(),
            });
        }

        let listing: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Reddit JSON parse error: {}", e)))?;

        parse_listing(url, &listing, self.max_comments)
    }

    async fn access_token(&self, creds: &RedditCredentials) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .header(USER_AGENT, &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                service: "reddit-oauth".to_string(),
                status: status.as_u16(),
            });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Reddit token parse error: {}", e)))?;

        // Refresh a minute early
        let lifetime = Duration::from_secs(body.expires_in.saturating_sub(60));
        let value = body.access_token;
        *guard = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + lifetime,
        });

        tracing::debug!(expires_in = body.expires_in, "Obtained Reddit access token");
        Ok(value)
    }
}

#[async_trait]
impl ThreadSource for RedditClient {
    async fn fetch_thread(&self, url: &str) -> Thread {
        match self.try_fetch(url).await {
            Ok(thread) => thread,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Reddit fetch failed");
                Thread::empty(url)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expiry")]
    expires_in: u64,
}

fn default_expiry() -> u64 {
    3600
}

/// Extract a [`Thread`] from a Reddit comments listing.
///
/// The listing is a two-element array: the submission listing followed by the
/// comment forest. Only top-level `t1` comments are kept, in order.
pub fn parse_listing(url: &str, listing: &Value, max_comments: usize) -> Result<Thread> {
    let post = listing
        .get(0)
        .and_then(|l| l.pointer("/data/children/0/data"))
        .ok_or_else(|| SourceError::Parse("Listing has no submission".to_string()))?;

    let title = post.get("title").and_then(Value::as_str).unwrap_or_default();
    let body = post.get("selftext").and_then(Value::as_str).unwrap_or_default();

    let comments = listing
        .get(1)
        .and_then(|l| l.pointer("/data/children"))
        .and_then(Value::as_array)
        .map(|children| {
            children
                .iter()
                .filter(|c| c.get("kind").and_then(Value::as_str) == Some("t1"))
                .filter_map(|c| c.pointer("/data/body").and_then(Value::as_str))
                .take(max_comments)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Thread::new(url, title, body, comments))
}
