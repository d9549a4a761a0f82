//! Authentication handshake payloads

use serde::{Deserialize, Serialize};

/// Payload version requested in the handshake (brotli batches)
pub const AUTH_PROTOCOL_VERSION: u16 = 3;

/// Platform string announced to the relay
pub const AUTH_PLATFORM: &str = "web";

/// Connection type announced to the relay
pub const AUTH_CONNECTION_TYPE: u8 = 2;

/// Body of the `UserAuthentication` frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Canonical room id
    #[serde(rename = "roomid")]
    pub room_id: u64,
    /// Random per-attempt client identifier
    pub buvid: String,
    /// User id
    pub uid: i64,
    /// Requested payload version
    pub protover: u16,
    /// Client platform
    pub platform: String,
    /// Connection type
    #[serde(rename = "type")]
    pub kind: u8,
    /// Session token issued by the directory
    pub key: String,
}

impl AuthRequest {
    /// Build a web-platform request for the given room and token
    pub fn new(room_id: u64, uid: i64, buvid: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            room_id,
            buvid: buvid.into(),
            uid,
            protover: AUTH_PROTOCOL_VERSION,
            platform: AUTH_PLATFORM.to_string(),
            kind: AUTH_CONNECTION_TYPE,
            key: key.into(),
        }
    }
}

/// Body of the relay's answer to the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// 0 on success
    pub code: i64,
}

impl AuthResponse {
    /// Whether the relay accepted the handshake
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_request_field_names() {
        let req = AuthRequest::new(5440, 9, "buvid-1", "tok");
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "roomid": 5440,
                "buvid": "buvid-1",
                "uid": 9,
                "protover": 3,
                "platform": "web",
                "type": 2,
                "key": "tok",
            })
        );
    }

    #[test]
    fn test_auth_response_code() {
        let ok: AuthResponse = serde_json::from_str(r#"{"code":0}"#).unwrap();
        let rejected: AuthResponse = serde_json::from_str(r#"{"code":-101}"#).unwrap();
        assert!(ok.is_success());
        assert!(!rejected.is_success());
    }
}
