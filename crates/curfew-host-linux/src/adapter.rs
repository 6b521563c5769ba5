//! Linux host adapter implementation
//!
//! Enforcement goes through the systemd user tools: `loginctl
//! lock-session` for lock and `systemctl poweroff` for shutdown. Both run
//! to completion; a non-zero exit is reported as a HostError and it is up
//! to the caller whether that matters.

use async_trait::async_trait;
use curfew_host_api::{EnforcementHost, HostError, HostResult};
use tokio::process::Command;
use tracing::info;

/// Linux host adapter
pub struct LinuxHost;

impl LinuxHost {
    pub fn new() -> Self {
        Self
    }

    async fn run(program: &str, args: &[&str]) -> Result<(), String> {
        let status = Command::new(program)
            .args(args)
            .status()
            .await
            .map_err(|e| format!("failed to spawn {program}: {e}"))?;

        if status.success() {
            Ok(())
        } else {
            Err(format!("{program} exited with {status}"))
        }
    }
}

impl Default for LinuxHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnforcementHost for LinuxHost {
    async fn lock_screen(&self) -> HostResult<()> {
        info!("Locking session via loginctl");
        Self::run("loginctl", &["lock-session"])
            .await
            .map_err(HostError::LockFailed)
    }

    async fn shutdown(&self) -> HostResult<()> {
        info!("Powering off via systemctl");
        Self::run("systemctl", &["poweroff"])
            .await
            .map_err(HostError::ShutdownFailed)
    }
}
