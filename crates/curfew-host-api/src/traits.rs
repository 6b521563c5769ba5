//! Host adapter traits

use async_trait::async_trait;
use thiserror::Error;

/// Errors from host enforcement operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Lock failed: {0}")]
    LockFailed(String),

    #[error("Shutdown failed: {0}")]
    ShutdownFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HostResult<T> = Result<T, HostError>;

/// Host adapter trait - implemented by platform-specific adapters.
///
/// Both primitives are irreversible and immediate; there is no
/// confirmation or dry-run. Reporting or silently absorbing failures of
/// the underlying OS call is the adapter's responsibility.
#[async_trait]
pub trait EnforcementHost: Send + Sync {
    /// Lock the interactive session
    async fn lock_screen(&self) -> HostResult<()>;

    /// Power the machine off
    async fn shutdown(&self) -> HostResult<()>;

    /// Optional: check if the host adapter is healthy
    fn is_healthy(&self) -> bool {
        true
    }
}
