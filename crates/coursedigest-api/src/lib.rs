pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod render;
pub mod router;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
