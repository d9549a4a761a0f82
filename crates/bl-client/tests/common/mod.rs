//! In-memory relay and lookup doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use bl_client::Resolution;
use bl_core::config::ClientConfig;
use bl_core::traits::{
    Connection, Connector, LookupResponse, RelayHost, RelayInfo, RoomInfo, RoomLookup,
    WireMessage, WireSink, WireSource,
};
use bl_core::{ConnectionError, LookupError, RelayEndpoint, RoomIdentity, SessionToken};
use bl_protocol::{encode, Frame, Operation};

/// Counters observed by the test side of a mock relay
#[derive(Debug, Default)]
pub struct Probe {
    pub sends: AtomicUsize,
    pub failed: AtomicUsize,
    pub closed: AtomicBool,
}

struct MockSink {
    outbound: mpsc::UnboundedSender<WireMessage>,
    fail_at: Vec<usize>,
    probe: Arc<Probe>,
}

#[async_trait]
impl WireSink for MockSink {
    async fn send(&mut self, message: WireMessage) -> Result<(), ConnectionError> {
        let n = self.probe.sends.fetch_add(1, Ordering::SeqCst);
        if self.fail_at.contains(&n) {
            self.probe.failed.fetch_add(1, Ordering::SeqCst);
            return Err(ConnectionError::Send("simulated write failure".to_string()));
        }
        self.outbound
            .send(message)
            .map_err(|_| ConnectionError::Closed)
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        self.probe.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct MockSource {
    inbound: mpsc::UnboundedReceiver<Result<WireMessage, ConnectionError>>,
}

#[async_trait]
impl WireSource for MockSource {
    async fn recv(&mut self) -> Option<Result<WireMessage, ConnectionError>> {
        self.inbound.recv().await
    }
}

/// Test side of one relay connection
pub struct RelayHandle {
    /// Everything the client wrote, in order
    pub outbound: mpsc::UnboundedReceiver<WireMessage>,
    /// Feed messages (or read errors) to the client
    pub inbound: mpsc::UnboundedSender<Result<WireMessage, ConnectionError>>,
    pub probe: Arc<Probe>,
}

impl RelayHandle {
    /// Queue the relay's answer to the handshake
    pub fn reply_auth(&self, code: i64) {
        let body = format!(r#"{{"code":{}}}"#, code);
        self.push(encode(Operation::ConnectSuccess, 1, body.as_bytes()).unwrap());
    }

    /// Queue a raw binary message
    pub fn push(&self, bytes: impl Into<bytes::Bytes>) {
        self.inbound
            .send(Ok(WireMessage::Binary(bytes.into())))
            .expect("client source dropped");
    }

    /// Next frame written by the client
    pub async fn next_frame(&mut self) -> Frame {
        match self.outbound.recv().await {
            Some(WireMessage::Binary(bytes)) => {
                Frame::decode(bytes).expect("client wrote a bad frame")
            }
            other => panic!("expected a binary frame, got {:?}", other),
        }
    }
}

/// Create a relay connection; sends whose index is in `fail_at` fail
pub fn relay(fail_at: Vec<usize>) -> (Connection, RelayHandle) {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let probe = Arc::new(Probe::default());

    let connection = Connection::new(
        MockSink {
            outbound: out_tx,
            fail_at,
            probe: Arc::clone(&probe),
        },
        MockSource { inbound: in_rx },
    );

    (
        connection,
        RelayHandle {
            outbound: out_rx,
            inbound: in_tx,
            probe,
        },
    )
}

/// Connector serving prepared connections by URL
///
/// URLs without a prepared connection are refused; URLs marked as
/// hanging never complete the dial.
#[derive(Default)]
pub struct MockConnector {
    relays: Mutex<HashMap<String, Connection>>,
    hanging: HashSet<String>,
    pub dialed: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relay(self, host: &str, connection: Connection) -> Self {
        self.relays
            .lock()
            .unwrap()
            .insert(endpoint(host).wss_url(), connection);
        self
    }

    pub fn with_hanging(mut self, host: &str) -> Self {
        self.hanging.insert(endpoint(host).wss_url());
        self
    }

    pub fn dialed_hosts(&self) -> Vec<String> {
        self.dialed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn dial(&self, url: &str) -> Result<Connection, ConnectionError> {
        self.dialed.lock().unwrap().push(url.to_string());
        if self.hanging.contains(url) {
            std::future::pending::<()>().await;
        }
        self.relays
            .lock()
            .unwrap()
            .remove(url)
            .ok_or_else(|| ConnectionError::Dial {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

/// Lookup returning fixed answers for one room
pub struct MockLookup {
    pub room: LookupResponse<RoomInfo>,
    pub relay: LookupResponse<RelayInfo>,
}

impl MockLookup {
    pub fn serving(hosts: &[&str]) -> Self {
        Self {
            room: LookupResponse::ok(RoomInfo {
                room_id: 5440,
                uid: 9,
            }),
            relay: LookupResponse::ok(RelayInfo {
                token: "tok".to_string(),
                host_list: hosts
                    .iter()
                    .map(|h| RelayHost {
                        host: h.to_string(),
                        port: 2243,
                        wss_port: 443,
                        ws_port: 2244,
                    })
                    .collect(),
            }),
        }
    }
}

#[async_trait]
impl RoomLookup for MockLookup {
    async fn room_info(&self, _room_id: u64) -> Result<LookupResponse<RoomInfo>, LookupError> {
        Ok(self.room.clone())
    }

    async fn relay_info(
        &self,
        _real_room_id: u64,
    ) -> Result<LookupResponse<RelayInfo>, LookupError> {
        Ok(self.relay.clone())
    }
}

pub fn endpoint(host: &str) -> RelayEndpoint {
    RelayEndpoint {
        host: host.to_string(),
        port: 2243,
        ws_port: 2244,
        wss_port: 443,
    }
}

pub fn resolution(hosts: &[&str]) -> Resolution {
    Resolution {
        identity: RoomIdentity {
            room_id: 1,
            real_room_id: 5440,
            uid: 9,
        },
        token: SessionToken::new("tok"),
        endpoints: hosts.iter().map(|h| endpoint(h)).collect(),
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::default()
}
