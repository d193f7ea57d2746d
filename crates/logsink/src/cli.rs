//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use logsink_core::Level;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logsink")]
#[command(version, about = "Append log records to a size-rotated log file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: logsink.toml/yaml/yml/json in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Active log file (default: platform log directory of --app)
    #[arg(short, long, env = "LOGSINK_FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Application name used to discover the log directory
    #[arg(long, global = true)]
    pub app: Option<String>,

    /// Rotate once the file exceeds this many bytes (<= 0 disables rotation)
    #[arg(long, allow_hyphen_values = true, global = true)]
    pub max_size: Option<i64>,

    /// Number of files kept, the newest archive included
    #[arg(long, global = true)]
    pub max_items: Option<usize>,

    /// Most verbose level written to the file
    #[arg(long, global = true)]
    pub threshold: Option<Level>,

    /// Line template
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write one record
    Write(WriteArgs),

    /// Write every line read from stdin as a record
    Pipe(PipeArgs),

    /// List archived log files, oldest first
    Archives,

    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct WriteArgs {
    /// Record level
    #[arg(short, long, default_value = "warn")]
    pub level: Level,

    /// Message parts, joined with spaces
    #[arg(required = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct PipeArgs {
    /// Level of every record
    #[arg(short, long, default_value = "warn")]
    pub level: Level,
}
