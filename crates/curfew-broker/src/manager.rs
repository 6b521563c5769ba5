//! Connection state machine
//!
//! The manager owns the transport and the two topics. It never retries
//! inline: a failed establishment leaves the link `Disconnected` and the
//! next periodic `check` performs exactly one more attempt, so a dead
//! broker costs one bounded step per cycle instead of blocking the
//! scheduler.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{Transport, TransportResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

pub struct ConnectionManager {
    transport: Arc<dyn Transport>,
    command_topic: String,
    status_topic: String,
    state: ConnectionState,
}

impl ConnectionManager {
    pub fn new(
        transport: Arc<dyn Transport>,
        command_topic: impl Into<String>,
        status_topic: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            command_topic: command_topic.into(),
            status_topic: status_topic.into(),
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// One bounded establishment attempt: connect, subscribe to the
    /// command topic, done. Returns true once the link is confirmed up.
    pub async fn establish(&mut self) -> bool {
        self.state = ConnectionState::Connecting;

        if let Err(e) = self.transport.connect().await {
            warn!(error = %e, "Broker connect failed");
            self.state = ConnectionState::Disconnected;
            return false;
        }
        if let Err(e) = self.transport.subscribe(&self.command_topic).await {
            warn!(error = %e, topic = %self.command_topic, "Broker subscribe failed");
            self.state = ConnectionState::Disconnected;
            return false;
        }

        if self.transport.is_connected() {
            info!(topic = %self.command_topic, "Broker link up");
            self.state = ConnectionState::Connected;
            true
        } else {
            // Session handshake still in flight; the next check settles it.
            false
        }
    }

    /// Periodic health check. Reconciles tracked state with the
    /// transport and makes at most one re-establishment attempt.
    pub async fn check(&mut self) -> ConnectionState {
        if self.transport.is_connected() {
            if self.state != ConnectionState::Connected {
                info!("Broker link healthy");
                self.state = ConnectionState::Connected;
            }
        } else {
            if self.state == ConnectionState::Connected {
                warn!("Broker link lost, re-establishing");
            }
            self.state = ConnectionState::Disconnected;
            self.establish().await;
        }
        self.state
    }

    pub async fn publish_status(&self, text: &str) -> TransportResult<()> {
        self.transport.publish(&self.status_topic, text).await
    }
}
