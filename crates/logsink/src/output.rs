//! Terminal output helpers

use colored::Colorize;
use logsink_file::Archive;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable JSON output mode
pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

/// Check if JSON output mode is enabled
pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print archives, oldest first
pub fn print_archives(archives: &[Archive]) {
    if is_json_mode() {
        let json: Vec<serde_json::Value> = archives
            .iter()
            .map(|archive| {
                serde_json::json!({
                    "path": archive.path.display().to_string(),
                    "suffix": archive.suffix,
                })
            })
            .collect();
        match serde_json::to_string_pretty(&json) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
        return;
    }

    if archives.is_empty() {
        print_info("No archived logs");
        return;
    }

    for archive in archives {
        println!("{}", archive.path.display());
    }
}
