//! curfewd - time-of-day access policy daemon
//!
//! This is the main entry point for the curfewd service.
//! It wires together all the components:
//! - Policy file storage
//! - Audit store
//! - MQTT broker link
//! - Command protocol
//! - Enforcement executor (Linux host adapter)
//! - The 60-second scheduler loop

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use curfew_broker::{ConnectionManager, ConnectionState, MqttTransport, Transport};
use curfew_config::{canonical_weekday, PolicyStore};
use curfew_core::{in_window, ActionExecutor, CommandProtocol};
use curfew_host_linux::LinuxHost;
use curfew_store::{AuditEvent, AuditEventType, SqliteStore, Store};
use curfew_util::{default_config_path, default_data_dir};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Scheduler cadence. Also paces link re-establishment attempts.
const CYCLE_PERIOD: Duration = Duration::from_secs(60);

/// curfewd - Time-of-day access policy daemon
#[derive(Parser, Debug)]
#[command(name = "curfewd")]
#[command(about = "Time-of-day access policy daemon with MQTT remote control", long_about = None)]
struct Args {
    /// Policy file path (default: ~/.config/curfewd/curfew.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set CURFEW_DATA_DIR env var)
    #[arg(short, long, env = "CURFEW_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Main service state
struct Service {
    policy: PolicyStore,
    store: Arc<dyn Store>,
    transport: Arc<MqttTransport>,
    manager: ConnectionManager,
    protocol: CommandProtocol,
    executor: ActionExecutor,
    link_up: bool,
}

impl Service {
    fn new(args: &Args) -> Result<Self> {
        let policy = PolicyStore::new(&args.config);
        let initial = policy
            .load()
            .with_context(|| format!("Failed to load policy from {:?}", args.config))?;

        info!(
            config_path = %args.config.display(),
            broker = %initial.mqtt.broker,
            day_count = initial.days.len(),
            "Policy loaded"
        );

        let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        let db_path = data_dir.join("curfewd.db");
        let store: Arc<dyn Store> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );

        info!(db_path = %db_path.display(), "Audit store initialized");

        let host = Arc::new(LinuxHost::new());
        let executor = ActionExecutor::new(host, Arc::clone(&store));
        let protocol = CommandProtocol::new(policy.clone(), Arc::clone(&store));

        let transport = Arc::new(MqttTransport::new(initial.mqtt.clone()));
        let link: Arc<dyn Transport> = transport.clone();
        let manager = ConnectionManager::new(
            link,
            initial.mqtt.subscribe_topic.clone(),
            initial.mqtt.publish_topic.clone(),
        );

        Ok(Self {
            policy,
            store,
            transport,
            manager,
            protocol,
            executor,
            link_up: false,
        })
    }

    async fn run(mut self) -> Result<()> {
        self.store
            .append_audit(AuditEvent::new(AuditEventType::DaemonStarted))?;

        let mut inbound = self
            .transport
            .take_inbound()
            .context("Inbound message receiver already taken")?;

        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

        if self.manager.establish().await {
            self.note_link_up();
        }

        let mut cycle_timer = tokio::time::interval(CYCLE_PERIOD);

        info!("Service running");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    break;
                }

                // Scheduler cycle: link health, policy reload, window check
                _ = cycle_timer.tick() => {
                    self.run_cycle().await;
                }

                // Inbound remote commands, handled as they arrive
                Some(payload) = inbound.recv() => {
                    self.handle_message(&payload).await;
                }
            }
        }

        info!("Shutting down curfewd");
        if let Err(e) = self
            .store
            .append_audit(AuditEvent::new(AuditEventType::DaemonStopped))
        {
            warn!(error = %e, "Failed to log daemon shutdown");
        }

        info!("Shutdown complete");
        Ok(())
    }

    /// One scheduler cycle: reconcile the link, reload policy, evaluate
    /// the window, and enforce or acknowledge.
    async fn run_cycle(&mut self) {
        let state = self.manager.check().await;
        match state {
            ConnectionState::Connected if !self.link_up => self.note_link_up(),
            ConnectionState::Connected => {}
            _ => {
                if self.link_up {
                    self.link_up = false;
                    self.record(AuditEventType::LinkLost);
                } else {
                    self.record(AuditEventType::LinkReconnectFailed {
                        error: "broker unreachable".into(),
                    });
                }
            }
        }

        let config = match self.policy.load() {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "Policy reload failed, skipping cycle");
                self.record(AuditEventType::StorageFailed {
                    error: e.to_string(),
                });
                return;
            }
        };

        let now = curfew_util::now();
        if in_window(&config, now) {
            self.publish("ok").await;
        } else {
            let day = canonical_weekday(now.weekday()).to_string();
            let reason = format!("outside allowed windows on {day}");
            warn!(day = %day, action = %config.action, "Current time denied");

            self.publish(&format!(
                "warning: {reason} at {}; executing {}",
                curfew_util::format_datetime_full(&now),
                config.action
            ))
            .await;
            self.record(AuditEventType::CycleDenied { day });
            self.executor.execute(config.action, &reason).await;
        }
    }

    /// One inbound command: acknowledge first, then enforce.
    async fn handle_message(&mut self, payload: &str) {
        info!(payload, "Command received");
        self.record(AuditEventType::CommandReceived {
            payload: payload.to_string(),
        });

        let outcome = self.protocol.apply(payload);
        if let Some(reply) = outcome.reply {
            self.publish(&reply).await;
        }
        if let Some((mode, reason)) = outcome.action {
            self.executor.execute(mode, &reason).await;
        }
    }

    async fn publish(&mut self, text: &str) {
        if let Err(e) = self.manager.publish_status(text).await {
            warn!(error = %e, "Status publish failed");
            self.record(AuditEventType::PublishFailed {
                error: e.to_string(),
            });
        }
    }

    fn note_link_up(&mut self) {
        self.link_up = true;
        self.record(AuditEventType::LinkConnected);
    }

    fn record(&self, event: AuditEventType) {
        if let Err(e) = self.store.append_audit(AuditEvent::new(event)) {
            error!(error = %e, "Failed to write audit entry");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "curfewd starting");

    let service = Service::new(&args)?;
    service.run().await
}
