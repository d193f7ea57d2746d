//! Command implementations

pub mod archives;
pub mod config;
pub mod pipe;
pub mod write;

use anyhow::{Context, Result};
use logsink_core::{ConfigFile, SinkConfig};
use tracing::debug;

use crate::cli::Cli;

/// Load the config file, if any, and apply command line overrides
pub fn load_config(cli: &Cli) -> Result<SinkConfig> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => ConfigFile::find(&std::env::current_dir()?),
    };

    let mut config = match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            ConfigFile::load(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?
                .file
        }
        None => SinkConfig::default(),
    };

    if let Some(file) = &cli.file {
        config.file = Some(file.clone());
    }
    if let Some(app) = &cli.app {
        config.app_name = Some(app.clone());
    }
    if let Some(max_size) = cli.max_size {
        config.max_size = max_size;
    }
    if let Some(max_items) = cli.max_items {
        config.max_items = max_items;
    }
    if let Some(threshold) = cli.threshold {
        config.level = Some(threshold);
    }
    if let Some(format) = &cli.format {
        config.format = format.clone();
    }

    Ok(config)
}
