use coursedigest_pipeline::CoursePipeline;
use std::sync::Arc;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The pipeline holds its own HTTP clients and cache handle and is built once
/// at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<CoursePipeline>,
}

impl AppState {
    pub fn new(config: Config, pipeline: CoursePipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        }
    }
}
