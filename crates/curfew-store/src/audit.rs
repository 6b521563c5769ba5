//! Audit event types
//!
//! Every command outcome, enforcement action, link transition, and error
//! becomes one append-only audit entry with a timestamp and severity.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Audit entry severity, mirrored to the console sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// Types of audit events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEventType {
    /// Daemon started
    DaemonStarted,

    /// Daemon stopped
    DaemonStopped,

    /// Inbound remote command received
    CommandReceived { payload: String },

    /// Command applied and acknowledged
    CommandApplied { payload: String, reply: String },

    /// Recognized command rejected (bad argument, no valid clauses, storage failure)
    CommandRejected { payload: String, reason: String },

    /// Unrecognized message, ignored
    CommandIgnored { payload: String },

    /// Enforcement action invoked
    ActionExecuted { mode: String, reason: String },

    /// Enforcement host call failed
    ActionFailed { mode: String, error: String },

    /// Scheduler cycle denied: current time outside all allowed windows
    CycleDenied { day: String },

    /// Broker link established (or re-established) and subscribed
    LinkConnected,

    /// Broker link lost
    LinkLost,

    /// Reconnect attempt failed
    LinkReconnectFailed { error: String },

    /// Status publish failed
    PublishFailed { error: String },

    /// Policy file could not be loaded
    StorageFailed { error: String },
}

impl AuditEventType {
    pub fn severity(&self) -> Severity {
        match self {
            AuditEventType::DaemonStarted
            | AuditEventType::DaemonStopped
            | AuditEventType::CommandReceived { .. }
            | AuditEventType::CommandApplied { .. }
            | AuditEventType::LinkConnected => Severity::Info,

            AuditEventType::CommandRejected { .. }
            | AuditEventType::CommandIgnored { .. }
            | AuditEventType::ActionExecuted { .. }
            | AuditEventType::CycleDenied { .. }
            | AuditEventType::LinkLost
            | AuditEventType::PublishFailed { .. } => Severity::Warning,

            AuditEventType::ActionFailed { .. }
            | AuditEventType::LinkReconnectFailed { .. }
            | AuditEventType::StorageFailed { .. } => Severity::Error,
        }
    }
}

/// Full audit event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID, assigned by the store
    pub id: i64,

    /// Event timestamp
    pub timestamp: DateTime<Local>,

    /// Severity derived from the event type
    pub severity: Severity,

    /// Event type and details
    pub event: AuditEventType,
}

impl AuditEvent {
    pub fn new(event: AuditEventType) -> Self {
        Self {
            id: 0, // Will be set by store
            timestamp: Local::now(),
            severity: event.severity(),
            event,
        }
    }
}
