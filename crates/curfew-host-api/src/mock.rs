//! Mock host adapter for testing

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::{EnforcementHost, HostError, HostResult};

/// A recorded enforcement invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    LockScreen,
    Shutdown,
}

/// Mock host adapter for unit/integration testing
pub struct MockHost {
    calls: Arc<Mutex<Vec<HostCall>>>,

    /// Configure lock_screen to fail
    pub fail_lock: Arc<Mutex<bool>>,

    /// Configure shutdown to fail
    pub fail_shutdown: Arc<Mutex<bool>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_lock: Arc::new(Mutex::new(false)),
            fail_shutdown: Arc::new(Mutex::new(false)),
        }
    }

    /// All enforcement invocations so far, in order
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnforcementHost for MockHost {
    async fn lock_screen(&self) -> HostResult<()> {
        if *self.fail_lock.lock().unwrap() {
            return Err(HostError::LockFailed("Mock lock failure".into()));
        }
        self.calls.lock().unwrap().push(HostCall::LockScreen);
        Ok(())
    }

    async fn shutdown(&self) -> HostResult<()> {
        if *self.fail_shutdown.lock().unwrap() {
            return Err(HostError::ShutdownFailed("Mock shutdown failure".into()));
        }
        self.calls.lock().unwrap().push(HostCall::Shutdown);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_records_calls_in_order() {
        let host = MockHost::new();

        host.lock_screen().await.unwrap();
        host.shutdown().await.unwrap();

        assert_eq!(host.calls(), vec![HostCall::LockScreen, HostCall::Shutdown]);
    }

    #[tokio::test]
    async fn mock_failure_toggles() {
        let host = MockHost::new();
        *host.fail_lock.lock().unwrap() = true;

        assert!(host.lock_screen().await.is_err());
        assert!(host.calls().is_empty());

        *host.fail_lock.lock().unwrap() = false;
        host.lock_screen().await.unwrap();
        assert_eq!(host.calls(), vec![HostCall::LockScreen]);
    }
}
