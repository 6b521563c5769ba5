//! Weekday normalization
//!
//! Day keys in the policy file and in `periods` commands arrive in several
//! spellings: full English names, 3-letter abbreviations, and Chinese names.
//! One static alias table maps all of them, case-insensitively, onto the 7
//! canonical lowercase English names used as the window key space.

use chrono::Weekday;

/// The 7 canonical weekday identifiers, in week order.
pub const CANONICAL_DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Alias table: every supported spelling and its canonical identifier.
const WEEKDAY_ALIASES: &[(&str, &str)] = &[
    ("monday", "monday"),
    ("mon", "monday"),
    ("星期一", "monday"),
    ("週一", "monday"),
    ("tuesday", "tuesday"),
    ("tue", "tuesday"),
    ("星期二", "tuesday"),
    ("週二", "tuesday"),
    ("wednesday", "wednesday"),
    ("wed", "wednesday"),
    ("星期三", "wednesday"),
    ("週三", "wednesday"),
    ("thursday", "thursday"),
    ("thu", "thursday"),
    ("星期四", "thursday"),
    ("週四", "thursday"),
    ("friday", "friday"),
    ("fri", "friday"),
    ("星期五", "friday"),
    ("週五", "friday"),
    ("saturday", "saturday"),
    ("sat", "saturday"),
    ("星期六", "saturday"),
    ("週六", "saturday"),
    ("sunday", "sunday"),
    ("sun", "sunday"),
    ("星期日", "sunday"),
    ("週日", "sunday"),
    ("星期天", "sunday"),
];

/// Normalize a weekday spelling to its canonical identifier.
///
/// Unrecognized input passes through lower-cased and trimmed; the
/// evaluator will simply never match such a key.
pub fn normalize_weekday(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    for (alias, canonical) in WEEKDAY_ALIASES {
        if *alias == lowered {
            return (*canonical).to_string();
        }
    }
    lowered
}

/// Canonical identifier for a chrono weekday.
pub fn canonical_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
