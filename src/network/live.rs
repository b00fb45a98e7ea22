use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::common::ChatMessage;

#[derive(Debug, Error)]
pub enum LiveError {
    #[error("websocket error: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("frame encode error: {0}")]
    Frame(#[from] serde_json::Error),
}

/// Frame sent to the push gateway right after connecting.
#[derive(Debug, Serialize)]
struct JoinFrame<'a> {
    event: &'static str,
    room: &'a str,
}

/// Frames received from the push gateway.
#[derive(Debug, Deserialize)]
struct PushFrame {
    event: String,
    #[serde(default)]
    payload: Option<ChatMessage>,
}

fn parse_push_frame(text: &str) -> Option<ChatMessage> {
    match serde_json::from_str::<PushFrame>(text) {
        Ok(frame) if frame.event == "receiveMessage" => frame.payload,
        Ok(frame) => {
            log::debug!("Ignoring push event {:?}", frame.event);
            None
        }
        Err(err) => {
            log::debug!("Skipping unparseable push frame: {err}");
            None
        }
    }
}

/// Push channel delivering new messages for one conversation room.
pub struct LiveChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl LiveChannel {
    /// Connect to the gateway and join the conversation's room.
    pub async fn join(url: &str, room: &str) -> Result<Self, LiveError> {
        let (mut stream, _) = connect_async(url).await?;
        let join = serde_json::to_string(&JoinFrame {
            event: "join",
            room,
        })?;
        stream.send(WsMessage::Text(join.into())).await?;
        Ok(Self { stream })
    }

    /// Next pushed chat message. Returns `None` once the channel is gone;
    /// non-chat frames are skipped.
    pub async fn next_message(&mut self) -> Option<ChatMessage> {
        while let Some(frame) = self.stream.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(err) => {
                    log::warn!("Live channel read error: {err}");
                    return None;
                }
            };
            let WsMessage::Text(text) = frame else {
                continue;
            };
            if let Some(message) = parse_push_frame(text.as_str()) {
                return Some(message);
            }
        }
        None
    }

    pub async fn close(mut self) {
        if let Err(err) = self.stream.close(None).await {
            log::debug!("Live channel close: {err}");
        }
    }
}
