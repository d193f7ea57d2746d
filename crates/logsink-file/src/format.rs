//! Template rendering for log lines and archive postfixes
//!
//! Templates use `{y} {m} {d} {h} {i} {s} {ms} {level} {text}` tokens. Every
//! occurrence is replaced; unknown `{...}` sequences are copied through.

use chrono::{Datelike, NaiveDateTime, Timelike};
use logsink_core::constants::EOL;
use logsink_core::Record;

/// How numeric time fields are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// `2024-1-5 9:0:0.0`
    None,
    /// `2024-01-05 09:00:00.000`
    Zero,
}

/// Render a record into one line, terminated with the platform EOL
pub fn render_line(template: &str, record: &Record) -> String {
    let mut line = render(template, |token| match token {
        "level" => Some(record.level.to_string()),
        "text" => Some(record.text()),
        _ => time_field(token, &record.timestamp, Padding::None),
    });
    line.push_str(EOL);
    line
}

/// Render only the time tokens of `template`
pub fn render_timestamp(template: &str, timestamp: &NaiveDateTime, padding: Padding) -> String {
    render(template, |token| time_field(token, timestamp, padding))
}

fn time_field(token: &str, ts: &NaiveDateTime, padding: Padding) -> Option<String> {
    let (value, width) = match token {
        "y" => (ts.year() as i64, 4),
        "m" => (ts.month() as i64, 2),
        "d" => (ts.day() as i64, 2),
        "h" => (ts.hour() as i64, 2),
        "i" => (ts.minute() as i64, 2),
        "s" => (ts.second() as i64, 2),
        // leap seconds report >= 1000ms
        "ms" => ((ts.nanosecond() / 1_000_000).min(999) as i64, 3),
        _ => return None,
    };

    Some(match padding {
        Padding::None => value.to_string(),
        Padding::Zero => format!("{:0width$}", value, width = width),
    })
}

fn render<F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let Some(end) = tail.find('}') else {
            out.push_str(tail);
            return out;
        };

        match lookup(&tail[1..end]) {
            Some(value) => {
                out.push_str(&value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
