//! CLI module for webharvest.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Harvest web pages into structured records and search them semantically.
#[derive(Debug, Parser)]
#[command(name = "webharvest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(long, short = 'f', global = true, help = "Output format: text or json")]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Harvest one page into the document store and vector index
    Harvest(commands::HarvestArgs),

    /// Search a tenant's harvested content
    Search(commands::SearchArgs),

    /// Fetch the stored record for a tenant and URL
    Get(commands::GetArgs),

    /// Check connectivity to the document store and vector index
    Status,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}

// FromStr for OutputFormat is implemented in models::search
