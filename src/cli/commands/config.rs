use anyhow::Result;
use clap::Subcommand;

use crate::models::{Config, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init,
}

pub async fn handle_config(cmd: ConfigCommand, _format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let config = redact(Config::load()?);
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommand::Path => match Config::config_path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("could not determine config directory"),
        },
        ConfigCommand::Init => {
            let path =
                Config::config_path().ok_or_else(|| anyhow::anyhow!("no config directory"))?;
            if path.exists() {
                anyhow::bail!("config file already exists at {}", path.display());
            }
            Config::default().save()?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}

/// Credentials never reach stdout.
fn redact(mut config: Config) -> Config {
    if config.generation.api_key.is_some() {
        config.generation.api_key = Some("[set]".to_string());
    }
    if config.embedding.api_key.is_some() {
        config.embedding.api_key = Some("[set]".to_string());
    }
    if config.vector_store.api_key.is_some() {
        config.vector_store.api_key = Some("[set]".to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_masks_keys() {
        let mut config = Config::default();
        config.generation.api_key = Some("sk-secret".to_string());
        let redacted = redact(config);
        assert_eq!(redacted.generation.api_key.as_deref(), Some("[set]"));
    }

    #[test]
    fn test_redact_keeps_none() {
        let redacted = redact(Config::default());
        assert!(redacted.generation.api_key.is_none());
    }
}
