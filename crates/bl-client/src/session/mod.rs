//! Relay session: handshake state machine and the active-phase tasks
//!
//! A `Session` owns exactly one relay connection. Once the handshake is
//! accepted the connection is split: the heartbeat task owns the writer
//! half and the receiver task owns the reader half. Both share a single
//! `CancellationToken`, so closing the session, dropping it, or losing
//! the connection stops both tasks.

mod handshake;
mod heartbeat;
mod receiver;
mod state;

pub use state::SessionState;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use bl_core::config::ClientConfig;
use bl_core::traits::Connector;
use bl_core::{ClientError, ConnectionError, RelayEndpoint, RoomIdentity};
use bl_protocol::{heartbeat_frame, Frame, ProtocolError};

use crate::directory::Resolution;
use heartbeat::HeartbeatTiming;
use state::AtomicState;

/// Events delivered by an active session, in wire order
#[derive(Debug)]
pub enum SessionEvent {
    /// A well-formed frame from the relay
    Frame(Frame),
    /// A message that did not decode as a frame
    Malformed(ProtocolError),
    /// The relay connection ended: `Closed` when the relay hung up,
    /// otherwise the read error that ended it
    Disconnected(ConnectionError),
}

/// A live, authenticated connection to one room's relay
pub struct Session {
    identity: RoomIdentity,
    endpoint: RelayEndpoint,
    state: Arc<AtomicState>,
    cancel: CancellationToken,
    events: mpsc::Receiver<SessionEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl Session {
    /// Dial the resolved relays, authenticate and start streaming
    ///
    /// Relays are tried in directory order and the first successful dial
    /// is used. On any failure the connection is released and the error
    /// returned; nothing is retried.
    pub async fn connect(
        connector: &dyn Connector,
        resolution: &Resolution,
        config: &ClientConfig,
    ) -> Result<Self, ClientError> {
        let state = Arc::new(AtomicState::new(SessionState::Idle));

        match Self::establish(connector, resolution, config, Arc::clone(&state)).await {
            Ok(session) => Ok(session),
            Err(e) => {
                state.transition(SessionState::Closed);
                tracing::warn!(room = %resolution.identity, error = %e, "session setup failed");
                Err(e)
            }
        }
    }

    async fn establish(
        connector: &dyn Connector,
        resolution: &Resolution,
        config: &ClientConfig,
        state: Arc<AtomicState>,
    ) -> Result<Self, ClientError> {
        let heartbeat = heartbeat_frame()?;

        // Dial relays in directory order
        state.transition(SessionState::Dialing);
        let (endpoint, mut connection) =
            handshake::dial_first(connector, &resolution.endpoints, config.connect_timeout).await?;

        // Authenticate, releasing the connection on failure
        state.transition(SessionState::Authenticating);
        if let Err(e) = handshake::authenticate(
            &mut connection,
            &resolution.identity,
            &resolution.token,
            config.auth_timeout,
        )
        .await
        {
            let _ = connection.sink.close().await;
            return Err(e);
        }

        // Split the connection between the two session tasks
        state.transition(SessionState::Active);

        let cancel = CancellationToken::new();
        let (event_tx, event_rx) = mpsc::channel(config.event_channel_capacity.max(1));
        let timing = HeartbeatTiming {
            interval: config.heartbeat_interval,
            retry_delay: config.heartbeat_retry_delay,
        };

        let tasks = vec![
            heartbeat::spawn_heartbeat(connection.sink, heartbeat, timing, cancel.clone()),
            receiver::spawn_receiver(
                connection.source,
                event_tx,
                Arc::clone(&state),
                cancel.clone(),
            ),
        ];

        Ok(Self {
            identity: resolution.identity,
            endpoint,
            state,
            cancel,
            events: event_rx,
            tasks,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// Whether the heartbeat and receiver tasks are still running
    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Room this session is attached to
    pub fn identity(&self) -> &RoomIdentity {
        &self.identity
    }

    /// Relay this session is connected to
    pub fn endpoint(&self) -> &RelayEndpoint {
        &self.endpoint
    }

    /// Token that stops the session when cancelled
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receive the next event from the relay
    ///
    /// Returns None once the session has closed and all buffered events
    /// were consumed.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Wait until the session ends for any reason
    pub async fn closed(&self) {
        self.cancel.cancelled().await;
    }

    /// Stop both tasks and release the connection
    pub async fn close(&mut self) {
        self.cancel.cancel();
        for handle in self.tasks.drain(..) {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "session task panicked");
            }
        }
        self.state.transition(SessionState::Closed);
        tracing::info!(room = %self.identity, endpoint = %self.endpoint, "session closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("endpoint", &self.endpoint)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
