//! MQTT transport over rumqttc
//!
//! Each `connect` builds a fresh client with a unique id and spawns a
//! delivery task that drives the rumqttc event loop. The task flips the
//! shared `connected` flag on ConnAck and on poll errors, re-subscribes
//! after a broker-initiated reconnect, and forwards publish payloads to
//! the inbound channel. On a poll error it sleeps out the backoff and
//! keeps polling; rumqttc reconnects on the next poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use curfew_config::MqttSettings;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{Transport, TransportError, TransportResult};

const DEFAULT_RECONNECT_BACKOFF: Duration = Duration::from_secs(60);

struct Session {
    client: AsyncClient,
    task: JoinHandle<()>,
}

pub struct MqttTransport {
    settings: MqttSettings,
    reconnect_backoff: Duration,
    connected: Arc<AtomicBool>,
    inbound_tx: mpsc::UnboundedSender<String>,
    inbound_rx: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
    session: tokio::sync::Mutex<Option<Session>>,
}

impl MqttTransport {
    pub fn new(settings: MqttSettings) -> Self {
        Self::with_backoff(settings, DEFAULT_RECONNECT_BACKOFF)
    }

    pub fn with_backoff(settings: MqttSettings, reconnect_backoff: Duration) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Self {
            settings,
            reconnect_backoff,
            connected: Arc::new(AtomicBool::new(false)),
            inbound_tx,
            inbound_rx: Mutex::new(Some(inbound_rx)),
            session: tokio::sync::Mutex::new(None),
        }
    }

    async fn delivery_loop(
        mut event_loop: EventLoop,
        client: AsyncClient,
        subscribe_topic: String,
        connected: Arc<AtomicBool>,
        inbound: mpsc::UnboundedSender<String>,
        backoff: Duration,
    ) {
        loop {
            match event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    connected.store(true, Ordering::SeqCst);
                    info!("Broker session established");
                    // Subscriptions do not survive a new session.
                    if let Err(e) = client.subscribe(&subscribe_topic, QoS::AtLeastOnce).await {
                        warn!(error = %e, "Failed to subscribe after reconnect");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let text = String::from_utf8_lossy(&publish.payload).trim().to_string();
                    debug!(topic = %publish.topic, "Inbound message");
                    if inbound.send(text).is_err() {
                        // Receiver dropped, the daemon is gone.
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    if connected.swap(false, Ordering::SeqCst) {
                        warn!(error = %e, "Broker link lost");
                    } else {
                        debug!(error = %e, "Broker still unreachable");
                    }
                    tokio::time::sleep(backoff).await;
                }
            }
        }
        connected.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for MqttTransport {
    async fn connect(&self) -> TransportResult<()> {
        let mut session = self.session.lock().await;
        if let Some(old) = session.take() {
            old.task.abort();
        }
        self.connected.store(false, Ordering::SeqCst);

        let client_id = format!("curfew-{}", Uuid::new_v4());
        let mut options =
            MqttOptions::new(client_id, &self.settings.broker, self.settings.port);
        options.set_keep_alive(Duration::from_secs(60));

        let (client, event_loop) = AsyncClient::new(options, 16);
        let task = tokio::spawn(Self::delivery_loop(
            event_loop,
            client.clone(),
            self.settings.subscribe_topic.clone(),
            Arc::clone(&self.connected),
            self.inbound_tx.clone(),
            self.reconnect_backoff,
        ));

        *session = Some(Session { client, task });
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> TransportResult<()> {
        let session = self.session.lock().await;
        let session = session.as_ref().ok_or(TransportError::NotConnected)?;
        session
            .client
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| TransportError::Subscribe(e.to_string()))
    }

    async fn publish(&self, topic: &str, payload: &str) -> TransportResult<()> {
        let session = self.session.lock().await;
        let session = session.as_ref().ok_or(TransportError::NotConnected)?;
        session
            .client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| TransportError::Publish(e.to_string()))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn take_inbound(&self) -> Option<mpsc::UnboundedReceiver<String>> {
        self.inbound_rx.lock().unwrap().take()
    }
}

impl Drop for MqttTransport {
    fn drop(&mut self) {
        if let Ok(mut session) = self.session.try_lock() {
            if let Some(old) = session.take() {
                old.task.abort();
            }
        }
    }
}
