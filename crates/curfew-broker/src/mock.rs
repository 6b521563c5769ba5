//! Mock transport for tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{Transport, TransportError, TransportResult};

/// In-memory `Transport` that records traffic and lets a test drive the
/// link state.
pub struct MockTransport {
    connected: AtomicBool,
    fail_connect: AtomicBool,
    fail_subscribe: AtomicBool,
    fail_publish: AtomicBool,
    connect_count: AtomicUsize,
    subscriptions: Mutex<Vec<String>>,
    published: Mutex<Vec<(String, String)>>,
    inbound_tx: mpsc::UnboundedSender<String>,
    inbound_rx: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            connected: AtomicBool::new(false),
            fail_connect: AtomicBool::new(false),
            fail_subscribe: AtomicBool::new(false),
            fail_publish: AtomicBool::new(false),
            connect_count: AtomicUsize::new(0),
            subscriptions: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
            inbound_tx,
            inbound_rx: Mutex::new(Some(inbound_rx)),
        })
    }

    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_subscribe(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_publish(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::SeqCst);
    }

    /// Drop the link as if the broker went away.
    pub fn simulate_disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Deliver a message as if it arrived on a subscribed topic.
    pub fn inject_inbound(&self, payload: &str) {
        self.inbound_tx
            .send(payload.trim().to_string())
            .expect("inbound receiver dropped");
    }

    pub fn connect_count(&self) -> usize {
        self.connect_count.load(Ordering::SeqCst)
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().unwrap().clone()
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&self) -> TransportResult<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(TransportError::Connect("mock connect failure".into()));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> TransportResult<()> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(TransportError::Subscribe("mock subscribe failure".into()));
        }
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }
        self.subscriptions.lock().unwrap().push(topic.to_string());
        Ok(())
    }

    async fn publish(&self, topic: &str, payload: &str) -> TransportResult<()> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(TransportError::Publish("mock publish failure".into()));
        }
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn take_inbound(&self) -> Option<mpsc::UnboundedReceiver<String>> {
        self.inbound_rx.lock().unwrap().take()
    }
}
