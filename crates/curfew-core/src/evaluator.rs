//! Window evaluation
//!
//! Pure function of the loaded policy and a timestamp. A day with no
//! schedule has no allowed windows, so any time on it is denied.

use chrono::{DateTime, Datelike, Local};
use curfew_config::{canonical_weekday, PolicyConfig};

/// Whether `now` falls inside any allowed window for its weekday.
/// Window bounds are inclusive on both ends.
pub fn in_window(config: &PolicyConfig, now: DateTime<Local>) -> bool {
    let day = canonical_weekday(now.weekday());
    match config.schedule_for(day) {
        Some(schedule) => schedule.windows.iter().any(|w| w.contains(now.time())),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .unwrap()
    }

    fn weekday_config() -> PolicyConfig {
        let mut config = PolicyConfig::default();
        config.set_day("monday", "08:00-19:20,20:00-22:00");
        config.set_day("saturday", "10:00-17:00");
        config
    }

    #[test]
    fn inside_a_window_is_allowed() {
        // 2026-08-17 is a Monday
        assert!(in_window(&weekday_config(), at(2026, 8, 17, 18, 0)));
        assert!(in_window(&weekday_config(), at(2026, 8, 17, 21, 30)));
    }

    #[test]
    fn gap_between_windows_is_denied() {
        assert!(!in_window(&weekday_config(), at(2026, 8, 17, 19, 30)));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let config = weekday_config();
        assert!(in_window(&config, at(2026, 8, 17, 8, 0)));
        assert!(in_window(&config, at(2026, 8, 17, 19, 20)));
        assert!(!in_window(&config, at(2026, 8, 17, 19, 21)));
    }

    #[test]
    fn day_without_schedule_is_denied() {
        // 2026-08-23 is a Sunday, not configured here
        assert!(!in_window(&weekday_config(), at(2026, 8, 23, 12, 0)));
    }

    #[test]
    fn seconds_do_not_extend_the_window() {
        let config = weekday_config();
        let end = Local.with_ymd_and_hms(2026, 8, 17, 19, 20, 59).unwrap();
        // 19:20:59 truncates to 19:20, still inside
        assert!(in_window(&config, end));
    }
}
