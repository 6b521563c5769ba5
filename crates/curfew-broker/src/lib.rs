//! Broker link for curfewd
//!
//! The daemon talks to its MQTT broker through the `Transport` trait so
//! the command loop can be tested against `MockTransport`. `MqttTransport`
//! is the production implementation over rumqttc; `ConnectionManager`
//! tracks link state and re-establishes the session from the periodic
//! health check.

mod manager;
mod mock;
mod mqtt;
mod traits;

pub use manager::*;
pub use mock::*;
pub use mqtt::*;
pub use traits::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("subscribe failed: {0}")]
    Subscribe(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("transport is not connected")]
    NotConnected,
}

pub type TransportResult<T> = Result<T, TransportError>;
