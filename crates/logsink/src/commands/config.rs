//! Config command implementation

use anyhow::Result;
use logsink_core::{ConfigFile, SinkConfig};

use crate::output::is_json_mode;

pub fn execute(config: SinkConfig) -> Result<()> {
    let config = ConfigFile { file: config };

    if is_json_mode() {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!("{}", config.to_toml()?);
    }

    Ok(())
}
