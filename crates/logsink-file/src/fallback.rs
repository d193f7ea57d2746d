//! Fallback channel for the sink's own failures
//!
//! Failures to resolve, open, write or rotate the log file are reported here
//! instead of being returned to the caller. A failing channel is ignored.

use chrono::Local;
use logsink_core::constants::{DEFAULT_FORMAT, FALLBACK_LABEL};
use logsink_core::{Level, Record};
use serde_json::Value;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::format::render_line;

/// Secondary output for sink diagnostics
pub trait FallbackChannel: Send {
    fn emit(&self, record: &Record) -> io::Result<()>;
}

/// Writes notices to stderr using the default line template
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleChannel;

impl FallbackChannel for ConsoleChannel {
    fn emit(&self, record: &Record) -> io::Result<()> {
        let line = render_line(DEFAULT_FORMAT, record);
        let mut stderr = io::stderr().lock();
        stderr.write_all(line.as_bytes())?;
        stderr.flush()
    }
}

/// Keeps notices in memory; clones share the same buffer
#[derive(Debug, Default, Clone)]
pub struct MemoryChannel {
    notices: Arc<Mutex<Vec<Record>>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Record> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    /// Rendered `{text}` of every notice
    pub fn messages(&self) -> Vec<String> {
        self.notices().iter().map(Record::text).collect()
    }
}

impl FallbackChannel for MemoryChannel {
    fn emit(&self, record: &Record) -> io::Result<()> {
        self.notices
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "fallback buffer poisoned"))?
            .push(record.clone());
        Ok(())
    }
}

/// Labels sink diagnostics and forwards them to a [`FallbackChannel`]
pub struct FallbackNotifier {
    channel: Box<dyn FallbackChannel>,
}

impl FallbackNotifier {
    pub fn new<C: FallbackChannel + 'static>(channel: C) -> Self {
        Self {
            channel: Box::new(channel),
        }
    }

    pub fn console() -> Self {
        Self::new(ConsoleChannel)
    }

    /// Emit `<label>: <message>` at warn level, plus the error detail if any
    pub fn notify(&self, message: &str, error: Option<&dyn std::error::Error>) {
        let mut payload = vec![Value::String(format!("{}: {}", FALLBACK_LABEL, message))];
        if let Some(error) = error {
            payload.push(Value::String(error.to_string()));
        }

        let record = Record {
            level: Level::Warn,
            timestamp: Local::now().naive_local(),
            payload,
        };

        let _ = self.channel.emit(&record);
    }
}

impl Default for FallbackNotifier {
    fn default() -> Self {
        Self::console()
    }
}

impl std::fmt::Debug for FallbackNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackNotifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenChannel;

    impl FallbackChannel for BrokenChannel {
        fn emit(&self, _record: &Record) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "console gone"))
        }
    }

    #[test]
    fn test_notice_is_labelled_warn() {
        let channel = MemoryChannel::new();
        let notifier = FallbackNotifier::new(channel.clone());

        notifier.notify("Could not set a log file", None);

        let notices = channel.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, Level::Warn);
        assert_eq!(notices[0].text(), "logsink.file: Could not set a log file");
    }

    #[test]
    fn test_notice_carries_error_detail() {
        let channel = MemoryChannel::new();
        let notifier = FallbackNotifier::new(channel.clone());
        let error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");

        notifier.notify("Could not rotate log", Some(&error));

        let notices = channel.notices();
        assert_eq!(notices[0].payload.len(), 2);
        assert_eq!(notices[0].text(), "logsink.file: Could not rotate log denied");
    }

    #[test]
    fn test_broken_channel_is_swallowed() {
        let notifier = FallbackNotifier::new(BrokenChannel);
        notifier.notify("nobody hears this", None);
    }
}
