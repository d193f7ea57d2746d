//! Active stream handle and its size bookkeeping

use logsink_core::StreamOptions;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// The open active log file
///
/// Current size is `size_at_open + bytes_written`: the on-disk size is
/// stat'd once, on first need, and every later write is accounted here.
#[derive(Debug)]
pub struct ActiveStream {
    path: PathBuf,
    file: Option<File>,
    size_at_open: Option<u64>,
    bytes_written: u64,
}

impl ActiveStream {
    /// Open or create `path`, creating missing parent directories
    pub fn open(path: &Path, options: &StreamOptions) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut open_options = OpenOptions::new();
        open_options.create(true);
        if options.append {
            open_options.append(true);
        } else {
            open_options.write(true).truncate(true);
        }

        #[cfg(unix)]
        {
            if let Some(mode) = options.mode {
                open_options.mode(mode);
            }
        }

        let file = open_options.open(path)?;
        debug!("Opened log file: {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            size_at_open: None,
            bytes_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written through this handle since it was opened
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Logical size of the file: stat'd once, then tracked by the write counter.
    /// A failed stat counts as an empty file.
    pub fn size(&mut self) -> u64 {
        let base = match self.size_at_open {
            Some(base) => base,
            None => {
                let base = fs::metadata(&self.path)
                    .map(|meta| meta.len().saturating_sub(self.bytes_written))
                    .unwrap_or(0);
                self.size_at_open = Some(base);
                base
            }
        };
        base + self.bytes_written
    }

    /// Write the whole line, counting it only once it landed.
    ///
    /// A failed write may have landed part of the line, so the cached base
    /// size is dropped and the next `size()` stats the file again.
    pub fn write(&mut self, line: &str) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "log stream is closed"))?;

        if let Err(e) = file.write_all(line.as_bytes()) {
            self.size_at_open = None;
            return Err(e);
        }
        self.bytes_written += line.len() as u64;
        Ok(())
    }

    /// Flush and release the handle. Closing twice is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        match self.file.take() {
            Some(mut file) => {
                file.flush()?;
                debug!("Closed log file: {}", self.path.display());
                Ok(())
            }
            None => Ok(()),
        }
    }
}
