//! Integration tests for curfewd
//!
//! These tests verify end-to-end behavior across the policy store, the
//! command protocol, the window evaluator, the enforcement executor, and
//! the broker link, using the mock transport and mock host.

use chrono::{DateTime, Local, TimeZone};
use curfew_broker::{ConnectionManager, ConnectionState, MockTransport, Transport};
use curfew_config::{ActionMode, PolicyStore};
use curfew_core::{in_window, ActionExecutor, CommandProtocol};
use curfew_host_api::{EnforcementHost, HostCall, MockHost};
use curfew_store::{SqliteStore, Store};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const POLICY: &str = "\
[mqtt]
broker = \"localhost\"
port = 1883
subscribe_topic = \"curfew/command\"
publish_topic = \"curfew/status\"

[action]
action = \"lock\"

[allowed_times]
monday = \"08:00-19:20,20:00-22:00\"
saturday = \"10:00-17:00\"
";

struct Harness {
    _file: NamedTempFile,
    policy: PolicyStore,
    protocol: CommandProtocol,
    executor: ActionExecutor,
    host: Arc<MockHost>,
}

fn harness() -> Harness {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(POLICY.as_bytes()).unwrap();

    let policy = PolicyStore::new(file.path());
    let audit = Arc::new(SqliteStore::in_memory().unwrap());
    let host = Arc::new(MockHost::new());

    Harness {
        policy: policy.clone(),
        protocol: CommandProtocol::new(policy, Arc::clone(&audit) as Arc<dyn Store>),
        executor: ActionExecutor::new(Arc::clone(&host) as Arc<dyn EnforcementHost>, audit),
        host,
        _file: file,
    }
}

// 2026-08-17 is a Monday
fn monday_at(hour: u32, minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 8, 17, hour, minute, 0)
        .unwrap()
}

#[tokio::test]
async fn allowed_window_takes_no_action() {
    let h = harness();
    let config = h.policy.load().unwrap();

    assert!(in_window(&config, monday_at(18, 0)));
    assert!(h.host.calls().is_empty());
}

#[tokio::test]
async fn denied_window_invokes_configured_action() {
    let h = harness();
    let config = h.policy.load().unwrap();

    assert!(!in_window(&config, monday_at(19, 30)));
    h.executor
        .execute(config.action, "outside allowed windows on monday")
        .await;

    assert_eq!(h.host.calls(), vec![HostCall::LockScreen]);
}

#[tokio::test]
async fn action_change_redirects_later_denied_cycles() {
    let h = harness();

    let outcome = h.protocol.apply("action = shutdown");
    assert_eq!(
        outcome.reply.as_deref(),
        Some("action mode updated: shutdown")
    );

    // A later cycle reloads the policy and picks up the new mode.
    let config = h.policy.load().unwrap();
    assert_eq!(config.action, ActionMode::Shutdown);
    assert!(!in_window(&config, monday_at(19, 30)));

    h.executor
        .execute(config.action, "outside allowed windows on monday")
        .await;
    assert_eq!(h.host.calls(), vec![HostCall::Shutdown]);
}

#[tokio::test]
async fn periods_update_changes_window_evaluation() {
    let h = harness();

    let outcome = h.protocol.apply("periods monday=09:00-17:00;tuesday=bad");
    assert_eq!(
        outcome.reply.as_deref(),
        Some("allowed times updated: monday")
    );

    let config = h.policy.load().unwrap();
    // 18:00 was inside the old window, outside the new one.
    assert!(!in_window(&config, monday_at(18, 0)));
    assert!(in_window(&config, monday_at(16, 0)));
}

#[tokio::test]
async fn reset_restores_builtin_profile() {
    let h = harness();

    h.protocol.apply("action = shutdown");
    h.protocol.apply("periods monday=00:00-00:01");
    h.protocol.apply("reset");

    let config = h.policy.load().unwrap();
    assert_eq!(config.action, ActionMode::Lock);
    assert_eq!(config.days.len(), 7);
    assert!(in_window(&config, monday_at(18, 0)));
}

#[tokio::test]
async fn status_enumerates_days_once_in_storage_order() {
    let h = harness();
    let outcome = h.protocol.apply("status");
    assert_eq!(
        outcome.reply.as_deref(),
        Some("action = lock; monday = 08:00-19:20,20:00-22:00; saturday = 10:00-17:00")
    );
}

#[tokio::test]
async fn immediate_command_acknowledges_before_enforcement() {
    let h = harness();
    let transport = MockTransport::new();
    let mut manager = ConnectionManager::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        "curfew/command",
        "curfew/status",
    );
    manager.establish().await;

    let outcome = h.protocol.apply("關機");
    manager
        .publish_status(outcome.reply.as_deref().unwrap())
        .await
        .unwrap();
    let (mode, reason) = outcome.action.unwrap();
    h.executor.execute(mode, &reason).await;

    assert_eq!(
        transport.published(),
        vec![(
            "curfew/status".to_string(),
            "executing shutdown by remote command".to_string()
        )]
    );
    assert_eq!(h.host.calls(), vec![HostCall::Shutdown]);
}

#[tokio::test]
async fn link_recovers_before_further_commands() {
    let transport = MockTransport::new();
    let mut manager = ConnectionManager::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        "curfew/command",
        "curfew/status",
    );

    assert!(manager.establish().await);
    transport.simulate_disconnect();
    assert!(manager.publish_status("ok").await.is_err());

    // The periodic health check brings the link back, re-subscribed.
    assert_eq!(manager.check().await, ConnectionState::Connected);
    assert_eq!(
        transport.subscriptions(),
        vec!["curfew/command", "curfew/command"]
    );
    manager.publish_status("ok").await.unwrap();

    let mut inbound = transport.take_inbound().unwrap();
    transport.inject_inbound("status");
    assert_eq!(inbound.recv().await.unwrap(), "status");
}
