use anyhow::Result;
use clap::Args;
use std::time::Instant;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat, SearchResults};
use crate::pipeline::HarvestPipeline;

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(help = "Tenant whose content to search")]
    pub tenant: String,

    #[arg(help = "Search query text")]
    pub query: String,

    #[arg(long, short = 'n', help = "Maximum number of results to return")]
    pub limit: Option<u32>,
}

pub async fn handle_search(args: SearchArgs, format: OutputFormat) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        anyhow::bail!("search query cannot be empty");
    }

    let config = Config::load()?;
    let formatter = get_formatter(format);

    let limit = args.limit.unwrap_or(config.search.default_limit);
    if limit == 0 {
        anyhow::bail!("limit must be at least 1");
    }

    let pipeline = HarvestPipeline::connect(&config).await?;
    pipeline.startup_check().await?;

    let start_time = Instant::now();
    let hits = pipeline
        .search(&args.tenant, query, u64::from(limit))
        .await?;
    let duration_ms = start_time.elapsed().as_millis() as u64;

    let results = SearchResults::new(query.to_string(), hits, duration_ms);
    print!("{}", formatter.format_search_results(&results));

    Ok(())
}
