//! Pipe command implementation - one record per stdin line

use anyhow::{Context, Result};
use logsink_core::{Record, SinkConfig};
use logsink_file::FileSink;
use std::io::{self, BufRead};
use tracing::info;

use crate::cli::PipeArgs;

pub fn execute(config: SinkConfig, args: PipeArgs) -> Result<()> {
    let mut sink = FileSink::new(config);
    let mut count = 0usize;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        sink.write(&Record::message(args.level, line));
        count += 1;
    }

    sink.close();
    info!("Piped {} record(s)", count);

    Ok(())
}
