pub mod key;
pub mod store;
pub mod disk;
pub mod memory;
pub mod typed;
pub mod error;

pub use key::CacheKey;
pub use store::CacheStore;
pub use disk::DiskCache;
pub use memory::MemoryCache;
pub use typed::{load, store};
pub use error::CacheError;
