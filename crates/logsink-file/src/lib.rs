//! logsink file sink - size-rotated log file with bounded archives

mod fallback;
mod format;
mod path;
mod rotation;
mod sink;
mod stream;

pub use fallback::{ConsoleChannel, FallbackChannel, FallbackNotifier, MemoryChannel};
pub use format::{render_line, render_timestamp, Padding};
pub use path::{LogPathResolver, PlatformLogPath};
pub use rotation::{archive_path, archive_postfix, list_archives, parse_suffix, remove_archives, Archive};
pub use sink::{FileSink, SinkState};
pub use stream::ActiveStream;

use logsink_core::SinkConfig;
use std::path::PathBuf;

/// The file a sink built from `config` would write to, resolved the same way
pub fn resolve_log_path(config: &SinkConfig) -> Option<PathBuf> {
    config
        .file
        .clone()
        .or_else(|| PlatformLogPath.resolve(config.app_name.as_deref()))
}
