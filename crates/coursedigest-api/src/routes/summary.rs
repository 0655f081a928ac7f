use axum::{
    extract::State,
    response::Html,
    Form, Json,
};
use coursedigest_pipeline::CourseReport;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    render,
    state::AppState,
};

const EMPTY_QUERY: &str = "Please enter a course code.";

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub query: String,
}

/// Search form
pub async fn index() -> Html<String> {
    Html(render::page("", None, None))
}

/// Form submission: run the pipeline and render the report page
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Form(req): Form<SummaryRequest>,
) -> ApiResult<Html<String>> {
    let query = req.query.trim();
    if query.is_empty() {
        return Ok(Html(render::page("", None, Some(EMPTY_QUERY))));
    }

    let report = run_pipeline(&state, query).await?;
    Ok(Html(render::page(query, Some(&report), None)))
}

/// JSON API: the raw report
pub async fn api_summary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummaryRequest>,
) -> ApiResult<Json<CourseReport>> {
    let query = req.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    Ok(Json(run_pipeline(&state, query).await?))
}

// Detached so a client disconnect does not abort the run halfway through its cache writes
async fn run_pipeline(state: &AppState, query: &str) -> ApiResult<CourseReport> {
    let pipeline = Arc::clone(&state.pipeline);
    let query = query.to_string();
    let report = tokio::spawn(async move { pipeline.run(&query).await }).await?;

    tracing::info!(
        query = %report.query,
        posts = report.posts.len(),
        sources = report.sources.len(),
        status = ?report.summary.status,
        "Course report ready"
    );
    Ok(report)
}
