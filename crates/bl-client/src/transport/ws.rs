//! WebSocket connector backed by tokio-tungstenite

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use bl_core::traits::{Connection, Connector, WireMessage, WireSink, WireSource};
use bl_core::ConnectionError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Dials `ws://` and `wss://` relay URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl WsConnector {
    /// Create a new connector
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn dial(&self, url: &str) -> Result<Connection, ConnectionError> {
        let (stream, response) = connect_async(url)
            .await
            .map_err(|e| ConnectionError::Dial {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(%url, status = %response.status(), "websocket upgraded");

        // Hand each half to its own owner
        let (sink, source) = stream.split();
        Ok(Connection::new(
            WsSink { inner: sink },
            WsSource { inner: source },
        ))
    }
}

/// Writer half of a relay WebSocket
struct WsSink {
    inner: SplitSink<WsStream, Message>,
}

#[async_trait]
impl WireSink for WsSink {
    async fn send(&mut self, message: WireMessage) -> Result<(), ConnectionError> {
        let message = match message {
            WireMessage::Binary(bytes) => Message::Binary(bytes),
            WireMessage::Text(text) => Message::Text(text.into()),
            WireMessage::Close => Message::Close(None),
        };
        self.inner
            .send(message)
            .await
            .map_err(|e| ConnectionError::Send(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        self.inner
            .close()
            .await
            .map_err(|e| ConnectionError::Send(e.to_string()))
    }
}

/// Reader half of a relay WebSocket
struct WsSource {
    inner: SplitStream<WsStream>,
}

#[async_trait]
impl WireSource for WsSource {
    async fn recv(&mut self) -> Option<Result<WireMessage, ConnectionError>> {
        loop {
            let message = match self.inner.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(ConnectionError::Receive(e.to_string()))),
            };

            match message {
                Message::Binary(bytes) => return Some(Ok(WireMessage::Binary(bytes))),
                Message::Text(text) => {
                    return Some(Ok(WireMessage::Text(text.as_str().to_owned())));
                }
                Message::Close(_) => return Some(Ok(WireMessage::Close)),
                // Control frames are answered by tungstenite itself
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }
}
