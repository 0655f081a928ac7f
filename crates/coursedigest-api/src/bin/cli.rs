//! One-shot course report on the terminal.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use coursedigest_api::{config::Config, logging::init_logging};
use coursedigest_pipeline::{CourseReport, MemoryCache, PipelineBuilder};

/// Summarize what Reddit says about a university course
#[derive(Parser)]
#[command(name = "coursedigest-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Course code, e.g. CS577
    course: String,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Keep the cache in memory for this run only
    #[arg(long)]
    no_cache: bool,

    /// Subreddit to search
    #[arg(long, env = "COURSEDIGEST_SUBREDDIT")]
    subreddit: Option<String>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    config.log.level = cli.log_level.clone();
    config.log.format = "compact".to_string();
    init_logging(&config.log);

    if let Some(subreddit) = &cli.subreddit {
        config.pipeline.subreddit = subreddit.clone();
    }

    let mut builder = PipelineBuilder::new().config(config.to_pipeline_config());
    if cli.no_cache {
        builder = builder.cache(Arc::new(MemoryCache::new()));
    }
    let pipeline = builder.build()?;
    let report = pipeline.run(&cli.course).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &CourseReport) {
    println!("Summary for {}\n", report.query);
    println!("{}\n", report.summary.narrative);
    if !report.summary.tags.is_empty() {
        println!("Tags: {}", report.summary.tags.join(", "));
    }
    println!("Estimated A Chance: {}\n", report.summary.estimate);

    for (idx, post) in report.posts.iter().enumerate() {
        println!("{}. {}", idx + 1, post.title);
        println!("   {}", post.url);
        println!("   {}\n", post.summary.replace('\n', "\n   "));
    }

    if report.posts.is_empty() && !report.sources.is_empty() {
        println!("Sources:");
        for url in &report.sources {
            println!("  {}", url);
        }
    }
}
