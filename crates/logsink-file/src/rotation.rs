//! Size-based rotation: archive naming, pruning and the archive step
//!
//! An archive is the former active file renamed to `<path>-<postfix>`.
//! Archives are ordered by the integer parsed from the postfix; a postfix
//! that does not start with a number counts as `0`, i.e. oldest.

use chrono::{DateTime, Duration, Local, Offset, TimeZone, Timelike};
use logsink_core::SinkConfig;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::fallback::FallbackNotifier;
use crate::format::{render_timestamp, Padding};
use crate::stream::ActiveStream;

/// An archived log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub path: PathBuf,
    /// Integer parsed from the postfix
    pub suffix: i64,
}

/// Whether the active stream has grown past the configured size
pub fn should_rotate(config: &SinkConfig, stream: &mut ActiveStream) -> bool {
    config
        .rotation_threshold()
        .map_or(false, |max_size| stream.size() > max_size)
}

/// Leading integer of `suffix`, or `0` when there is none
pub fn parse_suffix(suffix: &str) -> i64 {
    let s = suffix.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }

    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    if negative {
        -value
    } else {
        value
    }
}

/// `<active>-<postfix>`
pub fn archive_path(active: &Path, postfix: &str) -> PathBuf {
    let mut name = OsString::from(active.as_os_str());
    name.push("-");
    name.push(postfix);
    PathBuf::from(name)
}

/// Archives of `active` in its directory, oldest first
///
/// Any file whose name contains `<active name>-` is an archive.
pub fn list_archives(active: &Path) -> io::Result<Vec<Archive>> {
    let file_name = active
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?;
    let marker = format!("{}-", file_name.to_string_lossy());
    let dir = match active.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut archives = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(pos) = name.find(&marker) {
            archives.push(Archive {
                path: entry.path(),
                suffix: parse_suffix(&name[pos + marker.len()..]),
            });
        }
    }

    archives.sort_by_key(|archive| archive.suffix);
    Ok(archives)
}

/// How many of `found` pre-existing archives to delete so that, with the
/// archive about to be created, at most `max_items - 1` remain.
pub fn excess_archives(found: usize, max_items: usize) -> usize {
    found.saturating_sub(max_items.saturating_sub(2))
}

/// Postfix for an archive created at `now`
///
/// The clock is shifted by the UTC offset in whole hours (sign as in
/// "minutes behind UTC") before its fields are rendered, zero-padded.
/// With the default `{y}{m}{d}{h}{i}{s}` template two rotations within the
/// same second get the same postfix.
pub fn archive_postfix<Tz: TimeZone>(now: &DateTime<Tz>, template: &str) -> String {
    let local = now.naive_local();
    let offset_minutes = -now.offset().fix().local_minus_utc() / 60;

    // hours are set, not added: the fractional part of the offset truncates
    let shifted_hours = (local.hour() as f64 + offset_minutes as f64 / 60.0).trunc() as i64;
    let adjusted = local + Duration::hours(shifted_hours - local.hour() as i64);

    render_timestamp(template, &adjusted, Padding::Zero)
}

/// Delete the oldest archives of `active` beyond the retention count
pub fn prune(active: &Path, max_items: usize, notifier: &FallbackNotifier) {
    let archives = match list_archives(active) {
        Ok(archives) => archives,
        Err(e) => {
            notifier.notify("Could not read log directory contents", Some(&e));
            return;
        }
    };

    let excess = excess_archives(archives.len(), max_items);
    remove_archives(&archives[..excess], notifier);
}

/// Delete every archive in `archives`; a failed deletion is reported and the
/// rest are still attempted.
pub fn remove_archives(archives: &[Archive], notifier: &FallbackNotifier) {
    for archive in archives {
        match fs::remove_file(&archive.path) {
            Ok(()) => debug!("Removed archived log: {}", archive.path.display()),
            Err(e) => notifier.notify(
                &format!("Could not remove archived log {}", archive.path.display()),
                Some(&e),
            ),
        }
    }
}

/// Close `stream`, prune old archives and rename the active file.
///
/// If an archive with the same postfix already exists (a second rotation
/// within the resolution of `archive_format`), the rename replaces it, so
/// very small `max_size` values can lose archived lines.
///
/// Returns the active path to reopen, whether or not the rename worked.
pub fn archive(mut stream: ActiveStream, config: &SinkConfig, notifier: &FallbackNotifier) -> PathBuf {
    let path = stream.path().to_path_buf();
    debug!("Rotating log file: {} ({} bytes)", path.display(), stream.size());

    if let Err(e) = stream.close() {
        debug!("Closing {} before rotation failed: {}", path.display(), e);
    }

    prune(&path, config.max_items, notifier);

    let postfix = archive_postfix(&Local::now(), &config.archive_format);
    let target = archive_path(&path, &postfix);
    match fs::rename(&path, &target) {
        Ok(()) => debug!("Archived log file to {}", target.display()),
        Err(e) => notifier.notify("Could not rotate log", Some(&e)),
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::MemoryChannel;
    use chrono::FixedOffset;
    use logsink_core::StreamOptions;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name).unwrap();
    }

    #[test]
    fn test_parse_suffix() {
        assert_eq!(parse_suffix("20240105093000"), 20240105093000);
        assert_eq!(parse_suffix("12abc"), 12);
        assert_eq!(parse_suffix("x"), 0);
        assert_eq!(parse_suffix(""), 0);
        assert_eq!(parse_suffix("-3"), -3);
        assert_eq!(parse_suffix("  7"), 7);
    }

    #[test]
    fn test_suffix_ordering_treats_non_numeric_as_oldest() {
        let dir = TempDir::new().unwrap();
        for suffix in ["3", "x", "10", "1"] {
            touch(dir.path(), &format!("app.log-{}", suffix));
        }
        touch(dir.path(), "app.log");
        touch(dir.path(), "other.log-5");
        fs::create_dir(dir.path().join("app.log-99")).unwrap();

        let archives = list_archives(&dir.path().join("app.log")).unwrap();
        let suffixes: Vec<i64> = archives.iter().map(|a| a.suffix).collect();
        assert_eq!(suffixes, vec![0, 1, 3, 10]);
        assert!(archives[0].path.ends_with("app.log-x"));
    }

    #[test]
    fn test_excess_archives() {
        assert_eq!(excess_archives(0, 3), 0);
        assert_eq!(excess_archives(3, 4), 1);
        assert_eq!(excess_archives(2, 4), 0);
        assert_eq!(excess_archives(3, 2), 3);
        assert_eq!(excess_archives(3, 1), 3);
        assert_eq!(excess_archives(3, 0), 3);
    }

    #[test]
    fn test_archive_path() {
        let path = archive_path(Path::new("/var/log/app.log"), "20240105");
        assert_eq!(path, PathBuf::from("/var/log/app.log-20240105"));
    }

    #[test]
    fn test_archive_postfix_shifts_by_offset() {
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = east.with_ymd_and_hms(2024, 1, 5, 12, 30, 15).unwrap();
        assert_eq!(archive_postfix(&now, "{y}{m}{d}{h}{i}{s}"), "20240105103015");

        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = west.with_ymd_and_hms(2024, 1, 5, 22, 0, 0).unwrap();
        assert_eq!(archive_postfix(&now, "{y}{m}{d}{h}{i}{s}"), "20240106030000");
    }

    #[test]
    fn test_archive_postfix_fractional_offset() {
        // +05:30 is 330 minutes ahead: 9 - 5.5 = 3.5, truncated to 3
        let india = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let now = india.with_ymd_and_hms(2024, 1, 5, 9, 10, 0).unwrap();
        assert_eq!(archive_postfix(&now, "{h}{i}"), "0310");
    }

    #[test]
    fn test_prune_keeps_room_for_new_archive() {
        let dir = TempDir::new().unwrap();
        for suffix in ["3", "x", "10", "1"] {
            touch(dir.path(), &format!("app.log-{}", suffix));
        }
        let channel = MemoryChannel::new();
        let notifier = FallbackNotifier::new(channel.clone());

        prune(&dir.path().join("app.log"), 4, &notifier);

        let left: Vec<i64> = list_archives(&dir.path().join("app.log"))
            .unwrap()
            .iter()
            .map(|a| a.suffix)
            .collect();
        assert_eq!(left, vec![3, 10]);
        assert!(channel.notices().is_empty());
    }

    #[test]
    fn test_remove_archives_reports_and_continues() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app.log-2");
        let archives = vec![
            Archive {
                path: dir.path().join("app.log-1"),
                suffix: 1,
            },
            Archive {
                path: dir.path().join("app.log-2"),
                suffix: 2,
            },
        ];
        let channel = MemoryChannel::new();
        let notifier = FallbackNotifier::new(channel.clone());

        remove_archives(&archives, &notifier);

        let messages = channel.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Could not remove archived log"));
        assert!(messages[0].contains("app.log-1"));
        assert!(!dir.path().join("app.log-2").exists());
    }

    #[test]
    fn test_prune_missing_directory_is_reported() {
        let channel = MemoryChannel::new();
        let notifier = FallbackNotifier::new(channel.clone());

        prune(Path::new("/nonexistent/dir/app.log"), 4, &notifier);

        let messages = channel.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Could not read log directory contents"));
    }

    #[test]
    fn test_should_rotate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "x".repeat(101)).unwrap();
        let mut stream = ActiveStream::open(&path, &StreamOptions::default()).unwrap();

        assert!(should_rotate(&SinkConfig::new().with_max_size(100), &mut stream));
        assert!(!should_rotate(&SinkConfig::new().with_max_size(101), &mut stream));
        assert!(!should_rotate(&SinkConfig::new().with_max_size(0), &mut stream));
    }

    #[test]
    fn test_archive_renames_active_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let mut stream = ActiveStream::open(&path, &StreamOptions::default()).unwrap();
        stream.write("first\n").unwrap();

        let channel = MemoryChannel::new();
        let notifier = FallbackNotifier::new(channel.clone());
        let config = SinkConfig::new().with_archive_format("archived");

        let reopen = archive(stream, &config, &notifier);

        assert_eq!(reopen, path);
        assert!(!path.exists());
        let archived = dir.path().join("app.log-archived");
        assert_eq!(fs::read_to_string(archived).unwrap(), "first\n");
        assert!(channel.notices().is_empty());
    }
}
