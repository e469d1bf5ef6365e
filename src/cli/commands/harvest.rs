use anyhow::Result;
use clap::Args;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::pipeline::HarvestPipeline;

#[derive(Debug, Args)]
pub struct HarvestArgs {
    #[arg(help = "Tenant that owns the harvested content")]
    pub tenant: String,

    #[arg(help = "Absolute URL of the page to harvest")]
    pub url: String,
}

pub async fn handle_harvest(args: HarvestArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let pipeline = HarvestPipeline::connect(&config).await?;
    pipeline.startup_check().await?;

    match pipeline.harvest(&args.tenant, &args.url).await {
        Ok(report) => {
            print!("{}", formatter.format_harvest_report(&report));
            if !report.storage_succeeded {
                std::process::exit(1);
            }
        }
        Err(e) => {
            let message = match e.http_status_hint() {
                Some(status) => format!("{} (status {})", e, status),
                None => e.to_string(),
            };
            eprint!("{}", formatter.format_error(&message));
            std::process::exit(1);
        }
    }

    Ok(())
}
