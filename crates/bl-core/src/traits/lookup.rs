//! Room and relay lookup traits

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LookupError;
use crate::types::RelayEndpoint;

/// Envelope shared by both lookup responses
///
/// The service answers invalid rooms with `data` set to `null`, `{}` or
/// `[]`; anything that does not parse as `T` is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse<T> {
    /// 0 on success
    pub code: i64,
    /// Human-readable status
    #[serde(default)]
    pub message: String,
    /// Response body
    #[serde(default = "Option::default", deserialize_with = "lenient")]
    #[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
    pub data: Option<T>,
}

impl<T> LookupResponse<T> {
    /// Successful response carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            message: "0".to_string(),
            data: Some(data),
        }
    }

    /// Failed response with the given code
    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Whether the service reported success
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Room-identity lookup body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Canonical room id
    #[serde(alias = "roomid")]
    pub room_id: u64,
    /// Room owner id
    pub uid: i64,
}

/// One relay entry of the directory response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayHost {
    /// Host name
    pub host: String,
    /// Plain TCP port
    pub port: u16,
    /// Secure WebSocket port
    pub wss_port: u16,
    /// Non-secure WebSocket port
    pub ws_port: u16,
}

impl From<RelayHost> for RelayEndpoint {
    fn from(host: RelayHost) -> Self {
        Self {
            host: host.host,
            port: host.port,
            ws_port: host.ws_port,
            wss_port: host.wss_port,
        }
    }
}

/// Relay-directory lookup body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayInfo {
    /// Session token for the handshake
    pub token: String,
    /// Candidate relays in priority order
    #[serde(default)]
    pub host_list: Vec<RelayHost>,
}

/// Request/response lookup service backing the server directory
#[async_trait]
pub trait RoomLookup: Send + Sync {
    /// Resolve a (possibly short) room id to its canonical identity
    async fn room_info(&self, room_id: u64) -> Result<LookupResponse<RoomInfo>, LookupError>;

    /// Fetch the session token and relay list for a canonical room id
    async fn relay_info(&self, real_room_id: u64)
        -> Result<LookupResponse<RelayInfo>, LookupError>;
}
