//! HTTP implementation of the lookup service

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use bl_core::config::ClientConfig;
use bl_core::traits::{LookupResponse, RelayInfo, RoomInfo, RoomLookup};
use bl_core::LookupError;

/// Queries the public room and relay endpoints over HTTPS
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpLookup {
    /// Build a lookup client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| LookupError::Request(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: String,
    ) -> Result<LookupResponse<T>, LookupError> {
        tracing::debug!(%url, "lookup request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        response
            .json::<LookupResponse<T>>()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RoomLookup for HttpLookup {
    async fn room_info(&self, room_id: u64) -> Result<LookupResponse<RoomInfo>, LookupError> {
        self.get(self.config.room_init_url_for(room_id)).await
    }

    async fn relay_info(
        &self,
        real_room_id: u64,
    ) -> Result<LookupResponse<RelayInfo>, LookupError> {
        self.get(self.config.relay_info_url_for(real_room_id)).await
    }
}
