//! Policy data model
//!
//! `PolicyConfig` mirrors the policy file: broker settings, the enforcement
//! action, the per-day allowed windows, and the optional defaults profile a
//! `reset` command restores. The raw window text is kept alongside the
//! parsed windows so saving rewrites exactly what the operator configured.

use crate::weekday::normalize_weekday;
use crate::window::parse_windows;
use curfew_util::TimeWindow;
use std::fmt;
use std::str::FromStr;

/// Enforcement behavior applied outside all allowed windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMode {
    Lock,
    Shutdown,
}

impl ActionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionMode::Lock => "lock",
            ActionMode::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lock" => Ok(ActionMode::Lock),
            "shutdown" => Ok(ActionMode::Shutdown),
            other => Err(format!("unknown action mode '{other}'")),
        }
    }
}

/// Broker connection settings from the `[mqtt]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttSettings {
    pub broker: String,
    pub port: u16,
    pub subscribe_topic: String,
    pub publish_topic: String,
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            broker: "localhost".into(),
            port: 1883,
            subscribe_topic: "curfew/command".into(),
            publish_topic: "curfew/status".into(),
        }
    }
}

/// Allowed windows for one day key, in source-text order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    /// Normalized day key (canonical weekday, or lower-cased pass-through)
    pub day: String,

    /// Window list exactly as configured, e.g. `08:00-19:20,20:00-22:00`
    pub raw: String,

    /// Windows that parsed; malformed fragments were dropped at load
    pub windows: Vec<TimeWindow>,
}

impl DaySchedule {
    pub fn new(day: impl Into<String>, raw: impl Into<String>) -> Self {
        let day = normalize_weekday(&day.into());
        let raw = raw.into();
        let windows = parse_windows(&raw);
        Self { day, raw, windows }
    }
}

/// Fallback profile restored by the `reset` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultsProfile {
    pub action: ActionMode,
    /// (day key, raw window text) in storage order
    pub days: Vec<(String, String)>,
}

impl DefaultsProfile {
    /// The hardcoded profile materialized when no `[defaults]` section exists.
    pub fn builtin() -> Self {
        const SCHOOL_DAY: &str = "08:00-19:20,20:00-22:00";
        Self {
            action: ActionMode::Lock,
            days: vec![
                ("monday".into(), SCHOOL_DAY.into()),
                ("tuesday".into(), SCHOOL_DAY.into()),
                ("wednesday".into(), SCHOOL_DAY.into()),
                ("thursday".into(), SCHOOL_DAY.into()),
                ("friday".into(), SCHOOL_DAY.into()),
                ("saturday".into(), "10:00-17:00".into()),
                ("sunday".into(), "14:00-18:00".into()),
            ],
        }
    }
}

/// The full persisted policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    pub mqtt: MqttSettings,
    pub action: ActionMode,
    pub days: Vec<DaySchedule>,
    pub defaults: Option<DefaultsProfile>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            mqtt: MqttSettings::default(),
            action: ActionMode::Lock,
            days: Vec::new(),
            defaults: None,
        }
    }
}

impl PolicyConfig {
    /// Look up the schedule for a (canonical) day key.
    pub fn schedule_for(&self, day: &str) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.day == day)
    }

    /// Replace or append one day's window text, preserving storage order
    /// for days already present.
    pub fn set_day(&mut self, day: &str, raw: &str) {
        let schedule = DaySchedule::new(day, raw);
        match self.days.iter_mut().find(|d| d.day == schedule.day) {
            Some(existing) => *existing = schedule,
            None => self.days.push(schedule),
        }
    }

    /// Overwrite action and all day schedules from a defaults profile.
    pub fn apply_defaults(&mut self, profile: &DefaultsProfile) {
        self.action = profile.action;
        for (day, raw) in &profile.days {
            self.set_day(day, raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_mode_round_trip() {
        assert_eq!("lock".parse::<ActionMode>().unwrap(), ActionMode::Lock);
        assert_eq!(
            "Shutdown".parse::<ActionMode>().unwrap(),
            ActionMode::Shutdown
        );
        assert!("hibernate".parse::<ActionMode>().is_err());
        assert_eq!(ActionMode::Lock.to_string(), "lock");
    }

    #[test]
    fn day_schedule_normalizes_and_parses() {
        let d = DaySchedule::new("星期一", "08:00-19:20,20:00-22:00");
        assert_eq!(d.day, "monday");
        assert_eq!(d.windows.len(), 2);
        assert_eq!(d.raw, "08:00-19:20,20:00-22:00");
    }

    #[test]
    fn set_day_replaces_in_place() {
        let mut config = PolicyConfig::default();
        config.set_day("monday", "08:00-12:00");
        config.set_day("tuesday", "09:00-10:00");
        config.set_day("Mon", "13:00-14:00");

        assert_eq!(config.days.len(), 2);
        assert_eq!(config.days[0].day, "monday");
        assert_eq!(config.days[0].raw, "13:00-14:00");
        assert_eq!(config.days[1].day, "tuesday");
    }

    #[test]
    fn builtin_defaults_cover_the_week() {
        let profile = DefaultsProfile::builtin();
        assert_eq!(profile.action, ActionMode::Lock);
        assert_eq!(profile.days.len(), 7);
        assert_eq!(profile.days[0], ("monday".into(), "08:00-19:20,20:00-22:00".into()));
        assert_eq!(profile.days[6], ("sunday".into(), "14:00-18:00".into()));
    }

    #[test]
    fn apply_defaults_restores_everything() {
        let mut config = PolicyConfig {
            action: ActionMode::Shutdown,
            ..Default::default()
        };
        config.set_day("monday", "00:00-23:59");

        config.apply_defaults(&DefaultsProfile::builtin());

        assert_eq!(config.action, ActionMode::Lock);
        assert_eq!(config.days.len(), 7);
        assert_eq!(
            config.schedule_for("monday").unwrap().raw,
            "08:00-19:20,20:00-22:00"
        );
    }
}
