use std::sync::Arc;

use coursedigest_api::{build_router, config::Config, logging::init_logging, state::AppState};
use coursedigest_pipeline::PipelineBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config.log);

    tracing::info!("Starting Course Digest server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let pipeline = PipelineBuilder::new()
        .config(config.to_pipeline_config())
        .build()?;
    tracing::info!(
        search = pipeline.has_search(),
        llm = pipeline.has_llm(),
        cache_dir = %config.cache.directory.display(),
        "Pipeline ready"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, pipeline));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
