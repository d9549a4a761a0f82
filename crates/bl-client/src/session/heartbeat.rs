//! Periodic keep-alive sender

use std::time::Duration;

use bytes::Bytes;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use bl_core::traits::{WireMessage, WireSink};

/// Timing of the heartbeat loop
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeartbeatTiming {
    /// Delay after a successful send
    pub interval: Duration,
    /// Delay after a failed send before retrying the same frame
    pub retry_delay: Duration,
}

/// Spawn the heartbeat task, the only writer once the session is active
///
/// `frame` is written every `interval`. Send failures are logged and
/// retried after `retry_delay`; they never end the session. The task
/// closes the sink when cancelled.
pub(crate) fn spawn_heartbeat(
    mut sink: Box<dyn WireSink>,
    frame: Bytes,
    timing: HeartbeatTiming,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let sent = tokio::select! {
                _ = cancel.cancelled() => break,
                result = sink.send(WireMessage::Binary(frame.clone())) => result,
            };

            // Pick the next wait from the outcome
            let delay = match sent {
                Ok(()) => {
                    tracing::trace!(len = frame.len(), "heartbeat sent");
                    timing.interval
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        retry_in = ?timing.retry_delay,
                        "heartbeat send failed"
                    );
                    timing.retry_delay
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        // Cancelled: release the writer half
        if let Err(e) = sink.close().await {
            tracing::debug!(error = %e, "closing relay connection");
        }
        tracing::debug!("heartbeat task exiting");
    })
}
