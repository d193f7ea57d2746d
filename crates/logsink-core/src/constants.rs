//! Constants and default values for logsink

/// Default line template
pub const DEFAULT_FORMAT: &str = "[{y}-{m}-{d} {h}:{i}:{s}.{ms}] [{level}] {text}";

/// Default archive postfix template
pub const DEFAULT_ARCHIVE_FORMAT: &str = "{y}{m}{d}{h}{i}{s}";

/// Default max size of the active file in bytes (1MB)
pub const DEFAULT_MAX_SIZE: i64 = 1024 * 1024;

/// Default retention count, the about-to-be-created archive included
pub const DEFAULT_MAX_ITEMS: usize = 4;

/// File name used by platform log path discovery
pub const LOG_FILE_NAME: &str = "log.log";

/// Label prefixed to every fallback notice
pub const FALLBACK_LABEL: &str = "logsink.file";

/// Default config file names to search for (in priority order)
pub const CONFIG_FILES: &[&str] = &[
    "logsink.toml",
    "logsink.yaml",
    "logsink.yml",
    "logsink.json",
];

/// Platform line terminator
#[cfg(windows)]
pub const EOL: &str = "\r\n";

/// Platform line terminator
#[cfg(not(windows))]
pub const EOL: &str = "\n";
