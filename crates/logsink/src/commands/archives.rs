//! Archives command implementation

use anyhow::{bail, Context, Result};
use logsink_core::SinkConfig;
use logsink_file::{list_archives, resolve_log_path};

use crate::output::{print_archives, print_error};

pub fn execute(config: SinkConfig) -> Result<()> {
    let Some(path) = resolve_log_path(&config) else {
        print_error("Could not set a log file");
        bail!("No log file configured");
    };

    let archives = list_archives(&path)
        .with_context(|| format!("Failed to list archives of {}", path.display()))?;
    print_archives(&archives);

    Ok(())
}
