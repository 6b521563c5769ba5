//! Policy file persistence
//!
//! The policy lives in one sectioned TOML file (`[mqtt]`, `[action]`,
//! `[allowed_times]`, `[defaults]`). Both the scheduler loop and the
//! command protocol go through `PolicyStore`: every read loads the file
//! fresh, every mutation is a load-modify-save, so external edits are
//! picked up without a restart.
//!
//! Reads are tolerant: a day entry or window fragment that does not parse
//! is skipped with a warning. Only an unreadable or non-TOML file is an
//! error. Saves rewrite the whole file.

use crate::policy::{ActionMode, DaySchedule, DefaultsProfile, MqttSettings, PolicyConfig};
use crate::weekday::normalize_weekday;
use crate::StorageResult;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::warn;

/// Handle on the persisted policy file.
#[derive(Debug, Clone)]
pub struct PolicyStore {
    path: PathBuf,
}

impl PolicyStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the policy, tolerating malformed individual entries.
    pub fn load(&self) -> StorageResult<PolicyConfig> {
        let content = std::fs::read_to_string(&self.path)?;
        let root: Table = content.parse()?;

        let mqtt = root
            .get("mqtt")
            .and_then(Value::as_table)
            .map(parse_mqtt)
            .unwrap_or_default();

        let action = root
            .get("action")
            .and_then(Value::as_table)
            .and_then(|t| parse_action(t, "action section"))
            .unwrap_or(ActionMode::Lock);

        let days = root
            .get("allowed_times")
            .and_then(Value::as_table)
            .map(parse_day_table)
            .unwrap_or_default();

        let defaults = root
            .get("defaults")
            .and_then(Value::as_table)
            .map(parse_defaults);

        Ok(PolicyConfig {
            mqtt,
            action,
            days,
            defaults,
        })
    }

    /// Rewrite the whole policy file.
    pub fn save(&self, config: &PolicyConfig) -> StorageResult<()> {
        let mut root = Table::new();

        let mut mqtt = Table::new();
        mqtt.insert("broker".into(), Value::String(config.mqtt.broker.clone()));
        mqtt.insert("port".into(), Value::Integer(config.mqtt.port as i64));
        mqtt.insert(
            "subscribe_topic".into(),
            Value::String(config.mqtt.subscribe_topic.clone()),
        );
        mqtt.insert(
            "publish_topic".into(),
            Value::String(config.mqtt.publish_topic.clone()),
        );
        root.insert("mqtt".into(), Value::Table(mqtt));

        let mut action = Table::new();
        action.insert(
            "action".into(),
            Value::String(config.action.as_str().to_string()),
        );
        root.insert("action".into(), Value::Table(action));

        let mut allowed = Table::new();
        for day in &config.days {
            allowed.insert(day.day.clone(), Value::String(day.raw.clone()));
        }
        root.insert("allowed_times".into(), Value::Table(allowed));

        if let Some(profile) = &config.defaults {
            let mut defaults = Table::new();
            defaults.insert(
                "action".into(),
                Value::String(profile.action.as_str().to_string()),
            );
            for (day, raw) in &profile.days {
                defaults.insert(day.clone(), Value::String(raw.clone()));
            }
            root.insert("defaults".into(), Value::Table(defaults));
        }

        let text = toml::to_string_pretty(&root)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    /// Return the defaults profile, materializing the builtin one into
    /// `config` if the `[defaults]` section is absent. The caller persists.
    pub fn ensure_defaults(&self, config: &mut PolicyConfig) -> DefaultsProfile {
        match &config.defaults {
            Some(profile) => profile.clone(),
            None => {
                warn!("No [defaults] section, materializing builtin profile");
                let profile = DefaultsProfile::builtin();
                config.defaults = Some(profile.clone());
                profile
            }
        }
    }
}

fn parse_mqtt(table: &Table) -> MqttSettings {
    let defaults = MqttSettings::default();

    let broker = get_string(table, "broker", "mqtt").unwrap_or(defaults.broker);
    let port = match table.get("port") {
        Some(Value::Integer(p)) if (1..=i64::from(u16::MAX)).contains(p) => *p as u16,
        Some(other) => {
            warn!(value = %other, "Invalid mqtt port, using default");
            defaults.port
        }
        None => defaults.port,
    };
    let subscribe_topic =
        get_string(table, "subscribe_topic", "mqtt").unwrap_or(defaults.subscribe_topic);
    let publish_topic =
        get_string(table, "publish_topic", "mqtt").unwrap_or(defaults.publish_topic);

    MqttSettings {
        broker,
        port,
        subscribe_topic,
        publish_topic,
    }
}

fn parse_action(table: &Table, context: &str) -> Option<ActionMode> {
    let raw = get_string(table, "action", context)?;
    match raw.parse::<ActionMode>() {
        Ok(mode) => Some(mode),
        Err(e) => {
            warn!(context, error = %e, "Invalid action mode, using default");
            None
        }
    }
}

fn parse_day_table(table: &Table) -> Vec<DaySchedule> {
    let mut days = Vec::new();
    for (key, value) in table {
        match value.as_str() {
            Some(raw) => days.push(DaySchedule::new(key.as_str(), raw)),
            None => {
                warn!(day = %key, "Skipping non-string allowed_times entry");
            }
        }
    }
    days
}

fn parse_defaults(table: &Table) -> DefaultsProfile {
    let action = parse_action(table, "defaults section").unwrap_or(ActionMode::Lock);

    let mut days = Vec::new();
    for (key, value) in table {
        if key == "action" {
            continue;
        }
        match value.as_str() {
            Some(raw) => days.push((normalize_weekday(key), raw.to_string())),
            None => {
                warn!(day = %key, "Skipping non-string defaults entry");
            }
        }
    }

    DefaultsProfile { action, days }
}

fn get_string(table: &Table, key: &str, context: &str) -> Option<String> {
    match table.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            warn!(context, key, value = %other, "Expected string value");
            None
        }
        None => None,
    }
}
