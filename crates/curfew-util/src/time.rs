//! Time types for curfewd
//!
//! The policy file specifies allowed periods with minute precision
//! (`HH:MM-HH:MM`). `WallClock` models one such time of day and
//! `TimeWindow` one start/end pair. Evaluation is against the host's
//! local clock only; there is no timezone handling.

use chrono::{DateTime, Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Get the current local time.
///
/// Single seam for "now" so components take it as a parameter and
/// tests can pass fixed instants.
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Format a DateTime for log and status output.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// A time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallClock {
    pub hour: u8,
    pub minute: u8,
}

impl WallClock {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Truncates seconds; windows have minute precision.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Returns minutes since midnight
    pub fn as_minutes_from_midnight(&self) -> u32 {
        (self.hour as u32) * 60 + self.minute as u32
    }
}

impl PartialOrd for WallClock {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WallClock {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_minutes_from_midnight()
            .cmp(&other.as_minutes_from_midnight())
    }
}

impl std::fmt::Display for WallClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// An allowed period within a single day.
///
/// Bounds are inclusive on both ends: a window `08:00-19:20` still
/// allows the machine at exactly 19:20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: WallClock,
    pub end: WallClock,
}

impl TimeWindow {
    pub fn new(start: WallClock, end: WallClock) -> Self {
        Self { start, end }
    }

    /// Check if the given time of day falls within this window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        let t = WallClock::from_naive_time(time);
        self.start <= t && t <= self.end
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn wall_clock_ordering() {
        let morning = WallClock::new(8, 0).unwrap();
        let noon = WallClock::new(12, 0).unwrap();
        let evening = WallClock::new(19, 20).unwrap();

        assert!(morning < noon);
        assert!(noon < evening);
        assert_eq!(morning, WallClock::new(8, 0).unwrap());
    }

    #[test]
    fn wall_clock_rejects_out_of_range() {
        assert!(WallClock::new(24, 0).is_none());
        assert!(WallClock::new(12, 60).is_none());
        assert!(WallClock::new(23, 59).is_some());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = TimeWindow::new(
            WallClock::new(8, 0).unwrap(),
            WallClock::new(19, 20).unwrap(),
        );

        assert!(window.contains(t(8, 0, 0)));
        assert!(window.contains(t(12, 30, 0)));
        assert!(window.contains(t(19, 20, 0)));

        assert!(!window.contains(t(7, 59, 0)));
        assert!(!window.contains(t(19, 21, 0)));
    }

    #[test]
    fn window_ignores_seconds() {
        let window = TimeWindow::new(
            WallClock::new(8, 0).unwrap(),
            WallClock::new(19, 20).unwrap(),
        );

        // 19:20:59 truncates to 19:20, still inside
        assert!(window.contains(t(19, 20, 59)));
    }

    #[test]
    fn window_display() {
        let window = TimeWindow::new(
            WallClock::new(8, 0).unwrap(),
            WallClock::new(19, 20).unwrap(),
        );
        assert_eq!(window.to_string(), "08:00-19:20");
    }
}
