//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::serde_utils::{duration_millis, duration_secs};

/// Default room-identity lookup; `{}` is replaced by the room id
pub const DEFAULT_ROOM_INIT_URL: &str =
    "https://api.live.bilibili.com/room/v1/Room/room_init?id={}";

/// Default relay-directory lookup; `{}` is replaced by the real room id
pub const DEFAULT_RELAY_INFO_URL: &str =
    "https://api.live.bilibili.com/xlive/web-room/v1/index/getDanmuInfo?id={}";

/// Configuration for directory lookups and relay sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Room-identity lookup URL template
    pub room_init_url: String,

    /// Relay-directory lookup URL template
    pub relay_info_url: String,

    /// Timeout for each lookup request
    #[serde(with = "duration_secs")]
    pub http_timeout: Duration,

    /// Timeout for dialing a single relay endpoint
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,

    /// How long to wait for the handshake reply
    #[serde(with = "duration_secs")]
    pub auth_timeout: Duration,

    /// Interval between heartbeats while the session is active
    #[serde(with = "duration_secs")]
    pub heartbeat_interval: Duration,

    /// Delay before retrying a heartbeat that failed to send
    #[serde(with = "duration_millis")]
    pub heartbeat_retry_delay: Duration,

    /// Buffered inbound events before the receiver applies backpressure
    pub event_channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            room_init_url: DEFAULT_ROOM_INIT_URL.to_string(),
            relay_info_url: DEFAULT_RELAY_INFO_URL.to_string(),
            http_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            auth_timeout: Duration::from_secs(10),
            heartbeat_interval: Duration::from_secs(30),
            heartbeat_retry_delay: Duration::from_secs(1),
            event_channel_capacity: 256,
        }
    }
}

impl ClientConfig {
    /// Room-identity lookup URL for a room id
    pub fn room_init_url_for(&self, room_id: u64) -> String {
        self.room_init_url.replace("{}", &room_id.to_string())
    }

    /// Relay-directory lookup URL for a real room id
    pub fn relay_info_url_for(&self, real_room_id: u64) -> String {
        self.relay_info_url.replace("{}", &real_room_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.heartbeat_interval, Duration::from_secs(30));
        assert_eq!(config.heartbeat_retry_delay, Duration::from_secs(1));
        assert_eq!(config.event_channel_capacity, 256);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            heartbeat_interval = 20
            heartbeat_retry_delay = 500
            relay_info_url = "http://localhost:8080/relay?room={}"
            "#,
        )
        .unwrap();

        assert_eq!(config.heartbeat_interval, Duration::from_secs(20));
        assert_eq!(config.heartbeat_retry_delay, Duration::from_millis(500));
        assert_eq!(
            config.relay_info_url_for(5440),
            "http://localhost:8080/relay?room=5440"
        );
        assert_eq!(config.room_init_url, DEFAULT_ROOM_INIT_URL);
    }

    #[test]
    fn test_room_init_url_for() {
        let config = ClientConfig::default();
        assert_eq!(
            config.room_init_url_for(1),
            "https://api.live.bilibili.com/room/v1/Room/room_init?id=1"
        );
    }
}
