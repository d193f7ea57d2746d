//! Write command implementation

use anyhow::Result;
use logsink_core::{Record, SinkConfig};
use logsink_file::FileSink;
use serde_json::Value;

use crate::cli::WriteArgs;

pub fn execute(config: SinkConfig, args: WriteArgs) -> Result<()> {
    let mut sink = FileSink::new(config);
    let payload = args.text.into_iter().map(Value::String).collect();

    sink.write(&Record::new(args.level, payload));
    sink.close();

    Ok(())
}
