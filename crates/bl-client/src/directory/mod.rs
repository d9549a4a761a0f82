//! Server directory: room id → identity, token and relay candidates
//!
//! Both lookups are repeated on every call. Tokens and relay assignments
//! are short-lived and handed out by the server, so nothing is cached.

mod http;

pub use http::HttpLookup;

use std::sync::Arc;

use bl_core::traits::RoomLookup;
use bl_core::{ClientError, RelayEndpoint, RoomIdentity, SessionToken};

/// Everything needed to open a session to one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Canonical room identity
    pub identity: RoomIdentity,
    /// Credential for one handshake
    pub token: SessionToken,
    /// Candidate relays in priority order
    pub endpoints: Vec<RelayEndpoint>,
}

/// Resolves rooms through a `RoomLookup` collaborator
#[derive(Clone)]
pub struct Directory {
    lookup: Arc<dyn RoomLookup>,
}

impl Directory {
    /// Create a directory backed by the given lookup service
    pub fn new(lookup: Arc<dyn RoomLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve a (possibly short) room id
    ///
    /// Fails with `RoomNotFound` when the room lookup rejects the id and
    /// with `DirectoryUnavailable` when either lookup cannot be completed
    /// or the relay lookup reports failure.
    pub async fn resolve(&self, room_id: u64) -> Result<Resolution, ClientError> {
        tracing::debug!(room_id, "resolving room");

        let room = self
            .lookup
            .room_info(room_id)
            .await
            .map_err(|e| ClientError::DirectoryUnavailable(format!("room lookup: {}", e)))?;

        let info = match (room.is_success(), room.data) {
            (true, Some(info)) => info,
            _ => {
                tracing::warn!(
                    room_id,
                    code = room.code,
                    message = %room.message,
                    "room lookup rejected id"
                );
                return Err(ClientError::RoomNotFound { room_id });
            }
        };

        let identity = RoomIdentity {
            room_id,
            real_room_id: info.room_id,
            uid: info.uid,
        };

        let relay = self
            .lookup
            .relay_info(identity.real_room_id)
            .await
            .map_err(|e| ClientError::DirectoryUnavailable(format!("relay lookup: {}", e)))?;

        if !relay.is_success() {
            return Err(ClientError::DirectoryUnavailable(format!(
                "relay lookup returned code {}: {}",
                relay.code, relay.message
            )));
        }
        let relay = relay.data.ok_or_else(|| {
            ClientError::DirectoryUnavailable("relay lookup returned no data".to_string())
        })?;

        // Flatten the host list, keeping server order
        let endpoints: Vec<RelayEndpoint> = relay
            .host_list
            .into_iter()
            .map(RelayEndpoint::from)
            .collect();

        tracing::info!(room = %identity, relays = endpoints.len(), "room resolved");

        Ok(Resolution {
            identity,
            token: SessionToken::new(relay.token),
            endpoints,
        })
    }
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory").finish_non_exhaustive()
    }
}
