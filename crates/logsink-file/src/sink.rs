//! File sink: renders records, keeps the active file open and rotates it

use logsink_core::{Record, SinkConfig};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::fallback::{FallbackChannel, FallbackNotifier};
use crate::format::render_line;
use crate::path::{LogPathResolver, PlatformLogPath};
use crate::rotation::{self, Archive};
use crate::stream::ActiveStream;

/// Lifecycle of the active stream
#[derive(Debug)]
pub enum SinkState {
    /// No stream yet, or the last one was closed
    Uninitialized,
    /// Stream open at the resolved path
    Active(ActiveStream),
    /// No log path could be resolved; every write is a no-op from now on
    Disabled,
}

/// Appends records to a log file, rotating it once it exceeds `max_size`.
///
/// Writes never fail: problems are reported through the fallback channel
/// and the sink keeps accepting records.
///
/// ```no_run
/// use logsink_core::{Level, Record, SinkConfig};
/// use logsink_file::FileSink;
///
/// let mut sink = FileSink::new(SinkConfig::new().with_file("/tmp/app.log"));
/// sink.write(&Record::message(Level::Error, "disk almost full"));
/// ```
pub struct FileSink {
    config: SinkConfig,
    resolver: Box<dyn LogPathResolver>,
    notifier: FallbackNotifier,
    state: SinkState,
    /// Resolved once, on first write
    path: Option<PathBuf>,
    open_failed: bool,
}

impl FileSink {
    pub fn new(config: SinkConfig) -> Self {
        Self {
            config,
            resolver: Box::new(PlatformLogPath),
            notifier: FallbackNotifier::console(),
            state: SinkState::Uninitialized,
            path: None,
            open_failed: false,
        }
    }

    /// Replace platform discovery for sinks without an explicit `file`
    pub fn with_resolver<R: LogPathResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Replace the stderr fallback channel
    pub fn with_fallback<C: FallbackChannel + 'static>(mut self, channel: C) -> Self {
        self.notifier = FallbackNotifier::new(channel);
        self
    }

    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    /// Settings may change between writes; the resolved path does not.
    pub fn config_mut(&mut self) -> &mut SinkConfig {
        &mut self.config
    }

    pub fn state(&self) -> &SinkState {
        &self.state
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.state, SinkState::Disabled)
    }

    /// The active file path, once resolved
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Archives of the active file, oldest first
    pub fn archives(&self) -> io::Result<Vec<Archive>> {
        match &self.path {
            Some(path) => rotation::list_archives(path),
            None => Ok(Vec::new()),
        }
    }

    /// Render and append `record`, rotating first if the file is too large
    pub fn write(&mut self, record: &Record) {
        let line = render_line(&self.config.format, record);

        if matches!(self.state, SinkState::Uninitialized) {
            self.initialize();
        }

        if !record.level.passes(self.config.level) {
            return;
        }

        if let SinkState::Active(stream) = &mut self.state {
            if rotation::should_rotate(&self.config, stream) {
                self.rotate();
            }
        }

        let SinkState::Active(stream) = &mut self.state else {
            return;
        };

        if let Err(e) = stream.write(&line) {
            self.notifier.notify("Could not write to log file", Some(&e));
        }
    }

    /// Flush and close the active stream; the next write reopens it
    pub fn close(&mut self) {
        if let SinkState::Active(mut stream) = std::mem::replace(&mut self.state, SinkState::Uninitialized) {
            if let Err(e) = stream.close() {
                self.notifier.notify("Could not close log file", Some(&e));
            }
        }
    }

    fn initialize(&mut self) {
        if self.path.is_none() {
            self.path = self
                .config
                .file
                .clone()
                .or_else(|| self.resolver.resolve(self.config.app_name.as_deref()));
        }

        let Some(path) = self.path.clone() else {
            self.config.level = None;
            self.state = SinkState::Disabled;
            self.notifier.notify("Could not set a log file", None);
            return;
        };

        if self.config.level.is_none() {
            return;
        }

        self.open(path);
    }

    fn open(&mut self, path: PathBuf) {
        match ActiveStream::open(&path, &self.config.stream) {
            Ok(stream) => {
                self.open_failed = false;
                self.state = SinkState::Active(stream);
            }
            Err(e) => {
                // reported once per failure streak, retried on every write
                if !self.open_failed {
                    self.notifier.notify(
                        &format!("Could not open log file {}", path.display()),
                        Some(&e),
                    );
                    self.open_failed = true;
                }
                self.state = SinkState::Uninitialized;
            }
        }
    }

    fn rotate(&mut self) {
        let SinkState::Active(stream) = std::mem::replace(&mut self.state, SinkState::Uninitialized) else {
            return;
        };

        let path = rotation::archive(stream, &self.config, &self.notifier);
        self.open(path);
        debug!("Log rotation finished, active: {}", matches!(self.state, SinkState::Active(_)));
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
