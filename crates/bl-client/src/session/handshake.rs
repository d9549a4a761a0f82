//! Relay selection and the authentication handshake

use std::time::Duration;

use uuid::Uuid;

use bl_core::traits::{Connection, Connector, WireMessage};
use bl_core::{ClientError, ConnectionError, RelayEndpoint, RoomIdentity, SessionToken};
use bl_protocol::{
    encode, AuthRequest, AuthResponse, Operation, ProtocolError, DEFAULT_SEQUENCE, HEADER_SIZE,
};

/// Dial candidate relays in order and keep the first that answers
///
/// Individual dial failures are only logged; the caller sees
/// `NoReachableEndpoint` once every candidate has failed.
pub(crate) async fn dial_first(
    connector: &dyn Connector,
    endpoints: &[RelayEndpoint],
    connect_timeout: Duration,
) -> Result<(RelayEndpoint, Connection), ClientError> {
    for endpoint in endpoints {
        let url = endpoint.wss_url();
        tracing::debug!(%url, "dialing relay");

        let result = match tokio::time::timeout(connect_timeout, connector.dial(&url)).await {
            Ok(result) => result,
            Err(_) => Err(ConnectionError::Timeout(url.clone())),
        };

        match result {
            Ok(connection) => {
                tracing::info!(%endpoint, "connected to relay");
                return Ok((endpoint.clone(), connection));
            }
            Err(e) => {
                tracing::warn!(%endpoint, error = %e, "relay dial failed, trying next");
            }
        }
    }

    Err(ClientError::NoReachableEndpoint {
        attempted: endpoints.len(),
    })
}

/// Send the authentication frame and wait for the relay's verdict
pub(crate) async fn authenticate(
    connection: &mut Connection,
    identity: &RoomIdentity,
    token: &SessionToken,
    auth_timeout: Duration,
) -> Result<(), ClientError> {
    // Build the auth frame with a fresh client id
    let buvid = Uuid::new_v4().to_string();
    let request = AuthRequest::new(identity.real_room_id, identity.uid, buvid, token.as_str());
    let payload = serde_json::to_vec(&request).map_err(ProtocolError::from)?;
    let frame = encode(Operation::UserAuthentication, DEFAULT_SEQUENCE, &payload)?;

    tracing::debug!(room = %identity, len = frame.len(), "sending authentication");
    connection
        .sink
        .send(WireMessage::Binary(frame))
        .await
        .map_err(|e| ClientError::ConnectionLost(e.to_string()))?;

    // Wait for exactly one reply
    let reply = tokio::time::timeout(auth_timeout, connection.source.recv())
        .await
        .map_err(|_| {
            ClientError::ConnectionLost("timed out waiting for authentication reply".to_string())
        })?;

    let bytes = match reply {
        Some(Ok(WireMessage::Binary(bytes))) => bytes,
        Some(Ok(WireMessage::Text(_))) => {
            return Err(rejected("relay answered with a text message"));
        }
        Some(Ok(WireMessage::Close)) | None => {
            return Err(ClientError::ConnectionLost(
                "relay closed the connection during authentication".to_string(),
            ));
        }
        Some(Err(e)) => return Err(ClientError::ConnectionLost(e.to_string())),
    };

    // Check the reply carries a body
    if bytes.len() <= HEADER_SIZE {
        return Err(rejected(format!(
            "reply of {} bytes carries no payload",
            bytes.len()
        )));
    }

    // Parse the verdict
    let response: AuthResponse = serde_json::from_slice(&bytes[HEADER_SIZE..])
        .map_err(|e| rejected(format!("unreadable reply: {}", e)))?;

    if !response.is_success() {
        return Err(rejected(format!("relay returned code {}", response.code)));
    }

    tracing::info!(room = %identity, "authentication accepted");
    Ok(())
}

fn rejected(reason: impl Into<String>) -> ClientError {
    ClientError::AuthenticationRejected {
        reason: reason.into(),
    }
}
