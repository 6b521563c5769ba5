use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::TransportResult;

/// Message link to the broker.
///
/// Inbound messages arrive on a channel handed out once via
/// `take_inbound`; the daemon owns the receiving end for its lifetime.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish (or re-establish) the broker session. Any previous
    /// session is torn down first.
    async fn connect(&self) -> TransportResult<()>;

    /// Subscribe to a topic on the current session.
    async fn subscribe(&self, topic: &str) -> TransportResult<()>;

    /// Publish a text payload to a topic.
    async fn publish(&self, topic: &str, payload: &str) -> TransportResult<()>;

    /// Whether the session is currently believed healthy.
    fn is_connected(&self) -> bool;

    /// Hand out the inbound message receiver. Returns `None` after the
    /// first call.
    fn take_inbound(&self) -> Option<mpsc::UnboundedReceiver<String>>;
}
