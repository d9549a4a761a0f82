//! Top-level client: directory resolution plus one relay session

use std::sync::Arc;

use bl_core::config::ClientConfig;
use bl_core::traits::{Connector, RoomLookup};
use bl_core::ClientError;

use crate::directory::{Directory, HttpLookup};
use crate::session::Session;
use crate::transport::WsConnector;

/// Connects to the live-chat relay of a single room
pub struct Client {
    room_id: u64,
    config: ClientConfig,
    directory: Directory,
    connector: Arc<dyn Connector>,
}

impl Client {
    /// Create a client with explicit collaborators
    pub fn new(
        room_id: u64,
        config: ClientConfig,
        lookup: Arc<dyn RoomLookup>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            room_id,
            config,
            directory: Directory::new(lookup),
            connector,
        }
    }

    /// Create a client using the HTTP lookup and the WebSocket connector
    pub fn with_defaults(room_id: u64, config: ClientConfig) -> Result<Self, ClientError> {
        let lookup = HttpLookup::new(&config)
            .map_err(|e| ClientError::DirectoryUnavailable(e.to_string()))?;
        Ok(Self::new(
            room_id,
            config,
            Arc::new(lookup),
            Arc::new(WsConnector::new()),
        ))
    }

    /// Room id this client was created for
    pub fn room_id(&self) -> u64 {
        self.room_id
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve the room and open an authenticated session
    ///
    /// Every call resolves afresh; a failed or closed session is retried
    /// by calling `connect` again.
    pub async fn connect(&self) -> Result<Session, ClientError> {
        let resolution = self.directory.resolve(self.room_id).await?;
        Session::connect(self.connector.as_ref(), &resolution, &self.config).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("room_id", &self.room_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
