//! Command protocol
//!
//! Applies parsed remote commands against the policy store and produces
//! an `Outcome`: an optional reply for the status topic and an optional
//! enforcement action. The caller publishes the reply before executing
//! the action, so an immediate `shutdown` still acknowledges first.
//!
//! `apply` is infallible: storage failures become warning replies and a
//! `CommandRejected` audit entry instead of propagating.

use std::sync::Arc;

use curfew_config::{
    normalize_weekday, validate_windows, ActionMode, PolicyConfig, PolicyStore,
};
use curfew_store::{AuditEvent, AuditEventType, Store};
use tracing::{error, warn};

use crate::RemoteCommand;

/// What the daemon should do after a command was applied.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Reply text for the status topic, published first.
    pub reply: Option<String>,

    /// Enforcement action to execute, with its reason.
    pub action: Option<(ActionMode, String)>,
}

pub struct CommandProtocol {
    store: PolicyStore,
    audit: Arc<dyn Store>,
}

impl CommandProtocol {
    pub fn new(store: PolicyStore, audit: Arc<dyn Store>) -> Self {
        Self { store, audit }
    }

    /// Parse and apply one inbound payload.
    pub fn apply(&self, payload: &str) -> Outcome {
        match RemoteCommand::parse(payload) {
            RemoteCommand::Immediate(mode) => {
                let reply = format!("executing {mode} by remote command");
                self.record(AuditEventType::CommandApplied {
                    payload: payload.to_string(),
                    reply: reply.clone(),
                });
                Outcome {
                    reply: Some(reply),
                    action: Some((mode, "remote command".into())),
                }
            }

            RemoteCommand::SetAction(mode) => match self.update_action(mode) {
                Ok(reply) => self.applied(payload, reply),
                Err(reason) => self.rejected(payload, reason),
            },

            RemoteCommand::SetWindows(clauses) => match self.update_windows(&clauses) {
                Ok(reply) => self.applied(payload, reply),
                Err(reason) => self.rejected(payload, reason),
            },

            RemoteCommand::Reset => match self.restore_defaults() {
                Ok(reply) => self.applied(payload, reply),
                Err(reason) => self.rejected(payload, reason),
            },

            RemoteCommand::Status => match self.store.load() {
                Ok(config) => self.applied(payload, render_status(&config)),
                Err(e) => self.rejected(payload, e.to_string()),
            },

            RemoteCommand::Malformed { input, reason } => {
                warn!(input = %input, reason = %reason, "Malformed command");
                self.record(AuditEventType::CommandRejected {
                    payload: payload.to_string(),
                    reason: reason.clone(),
                });
                Outcome {
                    reply: Some(format!(
                        "warning: ignoring malformed command '{input}': {reason}"
                    )),
                    action: None,
                }
            }

            RemoteCommand::Unknown(text) => {
                warn!(text = %text, "Ignoring unrecognized message");
                self.record(AuditEventType::CommandIgnored {
                    payload: payload.to_string(),
                });
                Outcome::default()
            }
        }
    }

    fn update_action(&self, mode: ActionMode) -> Result<String, String> {
        let mut config = self.store.load().map_err(|e| e.to_string())?;
        config.action = mode;
        self.store.save(&config).map_err(|e| e.to_string())?;
        Ok(format!("action mode updated: {mode}"))
    }

    fn update_windows(&self, clauses: &[crate::WindowClause]) -> Result<String, String> {
        let mut config = self.store.load().map_err(|e| e.to_string())?;

        let mut updated = Vec::new();
        for clause in clauses {
            match validate_windows(&clause.text) {
                Ok(_) => {
                    config.set_day(&clause.day, &clause.text);
                    updated.push(normalize_weekday(&clause.day));
                }
                Err(e) => {
                    warn!(day = %clause.day, windows = %clause.text, error = %e,
                          "Dropping invalid period clause");
                }
            }
        }

        if updated.is_empty() {
            return Err("no valid periods".into());
        }
        self.store.save(&config).map_err(|e| e.to_string())?;
        Ok(format!("allowed times updated: {}", updated.join(", ")))
    }

    fn restore_defaults(&self) -> Result<String, String> {
        let mut config = self.store.load().map_err(|e| e.to_string())?;
        let profile = self.store.ensure_defaults(&mut config);
        config.apply_defaults(&profile);
        self.store.save(&config).map_err(|e| e.to_string())?;
        Ok(format!("defaults restored: {}", render_status(&config)))
    }

    fn applied(&self, payload: &str, reply: String) -> Outcome {
        self.record(AuditEventType::CommandApplied {
            payload: payload.to_string(),
            reply: reply.clone(),
        });
        Outcome {
            reply: Some(reply),
            action: None,
        }
    }

    fn rejected(&self, payload: &str, reason: String) -> Outcome {
        warn!(payload, reason = %reason, "Command rejected");
        self.record(AuditEventType::CommandRejected {
            payload: payload.to_string(),
            reason: reason.clone(),
        });
        Outcome {
            reply: Some(format!("warning: {reason}")),
            action: None,
        }
    }

    fn record(&self, event: AuditEventType) {
        if let Err(e) = self.audit.append_audit(AuditEvent::new(event)) {
            error!(error = %e, "Failed to write audit entry");
        }
    }
}

/// Render the action mode and all day schedules in storage order.
fn render_status(config: &PolicyConfig) -> String {
    let mut parts = vec![format!("action = {}", config.action)];
    for day in &config.days {
        parts.push(format!("{} = {}", day.day, day.raw));
    }
    parts.join("; ")
}
