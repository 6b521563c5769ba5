//! Enforcement executor
//!
//! Dispatches an action mode to the host adapter. Failures are logged and
//! audited but never propagated: a lock that did not take must not stop
//! the scheduler from trying again next cycle.

use std::sync::Arc;

use curfew_config::ActionMode;
use curfew_host_api::EnforcementHost;
use curfew_store::{AuditEvent, AuditEventType, Store};
use tracing::{error, warn};

pub struct ActionExecutor {
    host: Arc<dyn EnforcementHost>,
    audit: Arc<dyn Store>,
}

impl ActionExecutor {
    pub fn new(host: Arc<dyn EnforcementHost>, audit: Arc<dyn Store>) -> Self {
        Self { host, audit }
    }

    pub async fn execute(&self, mode: ActionMode, reason: &str) {
        warn!(mode = %mode, reason, "Executing enforcement action");
        self.record(AuditEventType::ActionExecuted {
            mode: mode.to_string(),
            reason: reason.to_string(),
        });

        let result = match mode {
            ActionMode::Lock => self.host.lock_screen().await,
            ActionMode::Shutdown => self.host.shutdown().await,
        };

        if let Err(e) = result {
            error!(mode = %mode, error = %e, "Enforcement action failed");
            self.record(AuditEventType::ActionFailed {
                mode: mode.to_string(),
                error: e.to_string(),
            });
        }
    }

    fn record(&self, event: AuditEventType) {
        if let Err(e) = self.audit.append_audit(AuditEvent::new(event)) {
            error!(error = %e, "Failed to write audit entry");
        }
    }
}
