pub mod types;
pub mod error;
pub mod query;
pub mod search;
pub mod reddit;
pub mod fetcher;

pub use types::Thread;
pub use error::SourceError;
pub use query::optimize_search_query;
pub use search::{filter_links, SearchProvider, SerpApiProvider};
pub use reddit::{parse_listing, RedditClient, RedditCredentials, ThreadSource};
pub use fetcher::fetch_threads;
