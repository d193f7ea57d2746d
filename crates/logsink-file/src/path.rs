//! Log path discovery

use logsink_core::constants::LOG_FILE_NAME;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Resolves the active log file when none is configured
pub trait LogPathResolver: Send {
    fn resolve(&self, app_name: Option<&str>) -> Option<PathBuf>;
}

/// `<platform log base>/<app name>/log.log`
///
/// The base is `~/Library/Logs` on macOS and the user config directory
/// elsewhere (`$XDG_CONFIG_HOME` or `~/.config` on Linux, Roaming AppData on
/// Windows). The app directory is created on resolution.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformLogPath;

impl PlatformLogPath {
    fn base_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join("Library").join("Logs"))
        }

        #[cfg(not(target_os = "macos"))]
        {
            dirs::config_dir()
        }
    }
}

impl LogPathResolver for PlatformLogPath {
    fn resolve(&self, app_name: Option<&str>) -> Option<PathBuf> {
        let app_name = app_name.filter(|name| !name.is_empty())?;
        let dir = Self::base_dir()?.join(app_name);

        if let Err(e) = fs::create_dir_all(&dir) {
            debug!("Cannot create log directory {}: {}", dir.display(), e);
            return None;
        }

        Some(dir.join(LOG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_app_name_resolves_nothing() {
        assert_eq!(PlatformLogPath.resolve(None), None);
        assert_eq!(PlatformLogPath.resolve(Some("")), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_uses_xdg_config_home() {
        let dir = tempfile::TempDir::new().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());

        let path = PlatformLogPath.resolve(Some("myapp")).unwrap();
        assert_eq!(path, dir.path().join("myapp").join("log.log"));
        assert!(dir.path().join("myapp").is_dir());
    }
}
