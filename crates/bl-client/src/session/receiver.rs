//! Inbound frame receiver

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use bl_core::traits::{WireMessage, WireSource};
use bl_core::ConnectionError;
use bl_protocol::Frame;

use super::state::{AtomicState, SessionState};
use super::SessionEvent;

/// Spawn the receiver task, the only reader once the session is active
///
/// Every message is decoded and forwarded in arrival order. When the
/// relay goes away the session is closed and the shared token cancelled,
/// which also stops the heartbeat task.
///
/// A channel slot is reserved before each read, so the event that ends
/// the session is always delivered even when the consumer lags behind.
pub(crate) fn spawn_receiver(
    mut source: Box<dyn WireSource>,
    events: mpsc::Sender<SessionEvent>,
    state: Arc<AtomicState>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let ended = loop {
            // Wait for room in the event channel
            let permit = tokio::select! {
                _ = cancel.cancelled() => break None,
                permit = events.reserve() => match permit {
                    Ok(permit) => permit,
                    Err(_) => {
                        tracing::debug!("event consumer dropped");
                        break None;
                    }
                },
            };

            // Read the next message
            let next = tokio::select! {
                _ = cancel.cancelled() => break None,
                next = source.recv() => next,
            };

            let bytes = match next {
                Some(Ok(WireMessage::Binary(bytes))) => bytes,
                Some(Ok(WireMessage::Text(text))) => text.into_bytes().into(),
                Some(Ok(WireMessage::Close)) | None => {
                    break Some((permit, ConnectionError::Closed));
                }
                Some(Err(e)) => break Some((permit, e)),
            };

            // Decode and forward
            let event = match Frame::decode(bytes) {
                Ok(frame) => {
                    tracing::trace!(op = frame.operation, len = frame.length, "frame received");
                    SessionEvent::Frame(frame)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "malformed frame from relay");
                    SessionEvent::Malformed(e)
                }
            };
            permit.send(event);
        };

        state.transition(SessionState::Closed);
        cancel.cancel();

        if let Some((permit, error)) = ended {
            tracing::warn!(error = %error, "relay session lost");
            permit.send(SessionEvent::Disconnected(error));
        }
        tracing::debug!("receiver task exiting");
    })
}
