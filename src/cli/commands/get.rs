use anyhow::Result;
use clap::Args;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::pipeline::HarvestPipeline;

#[derive(Debug, Args)]
pub struct GetArgs {
    #[arg(help = "Tenant that owns the record")]
    pub tenant: String,

    #[arg(help = "URL the record was harvested from")]
    pub url: String,
}

pub async fn handle_get(args: GetArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let pipeline = HarvestPipeline::connect(&config).await?;

    match pipeline.get_record(&args.tenant, &args.url).await? {
        Some(record) => print!("{}", formatter.format_record(&record)),
        None => {
            eprint!(
                "{}",
                formatter.format_error(&format!(
                    "no record for tenant {} and url {}",
                    args.tenant, args.url
                ))
            );
            std::process::exit(1);
        }
    }

    Ok(())
}
