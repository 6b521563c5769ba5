//! Window text parsing
//!
//! Allowed periods are written as comma-separated `HH:MM-HH:MM` fragments,
//! e.g. `08:00-19:20,20:00-22:00`. The policy loader parses tolerantly
//! (malformed fragments are skipped with a warning); the `periods` command
//! validates strictly so bad clauses are rejected instead of persisted.

use curfew_util::{TimeWindow, WallClock};
use thiserror::Error;
use tracing::warn;

/// A malformed window fragment
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WindowParseError {
    #[error("expected HH:MM-HH:MM, got '{0}'")]
    BadShape(String),

    #[error("invalid time '{0}': {1}")]
    BadTime(String, String),
}

/// Parse a single `HH:MM-HH:MM` fragment.
pub fn parse_window(fragment: &str) -> Result<TimeWindow, WindowParseError> {
    let fragment = fragment.trim();
    let (start_str, end_str) = fragment
        .split_once('-')
        .ok_or_else(|| WindowParseError::BadShape(fragment.to_string()))?;

    let start = parse_wall_clock(start_str.trim())?;
    let end = parse_wall_clock(end_str.trim())?;

    Ok(TimeWindow::new(start, end))
}

/// Parse a comma-separated window list, skipping malformed fragments.
pub fn parse_windows(raw: &str) -> Vec<TimeWindow> {
    raw.split(',')
        .filter(|f| !f.trim().is_empty())
        .filter_map(|fragment| match parse_window(fragment) {
            Ok(window) => Some(window),
            Err(e) => {
                warn!(fragment = fragment.trim(), error = %e, "Skipping malformed window");
                None
            }
        })
        .collect()
}

/// Validate a full window list strictly: every fragment must parse and
/// the list must be non-empty.
pub fn validate_windows(raw: &str) -> Result<Vec<TimeWindow>, WindowParseError> {
    let fragments: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    if fragments.is_empty() {
        return Err(WindowParseError::BadShape(raw.to_string()));
    }

    fragments.into_iter().map(parse_window).collect()
}

fn parse_wall_clock(s: &str) -> Result<WallClock, WindowParseError> {
    let (hour_str, minute_str) = s
        .split_once(':')
        .ok_or_else(|| WindowParseError::BadTime(s.to_string(), "expected HH:MM".into()))?;

    let hour: u8 = hour_str
        .trim()
        .parse()
        .map_err(|_| WindowParseError::BadTime(s.to_string(), "invalid hour".into()))?;
    let minute: u8 = minute_str
        .trim()
        .parse()
        .map_err(|_| WindowParseError::BadTime(s.to_string(), "invalid minute".into()))?;

    WallClock::new(hour, minute)
        .ok_or_else(|| WindowParseError::BadTime(s.to_string(), "out of range".into()))
}
