//! Socket client for the project event channel.
//!
//! One connection per viewed project: on connect the client announces
//! membership in that project's room with a `join_project` frame, then
//! relays `task_updated`, `task_claimed`, and `task_verified` frames
//! into an unbounded channel. Teardown always disconnects; reconnect
//! behavior is whatever the socket library does by default.

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;

use atelier_board::BoardEvent;

#[derive(Error, Debug)]
pub enum SocketError {
    #[error("Invalid socket URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("Send failed: {0}")]
    Send(String),
}

/// Room-membership announcement sent once after connecting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinFrame<'a> {
    event: &'static str,
    data: JoinData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinData<'a> {
    project_id: &'a str,
}

impl<'a> JoinFrame<'a> {
    fn for_project(project_id: &'a str) -> Self {
        Self {
            event: "join_project",
            data: JoinData { project_id },
        }
    }
}

/// A live project channel. Dropping the handle aborts the read loop and
/// closes the connection.
pub struct SocketHandle {
    events: mpsc::UnboundedReceiver<BoardEvent>,
    reader: JoinHandle<()>,
}

impl SocketHandle {
    /// Open the connection, join the project's room, and start relaying.
    pub async fn connect(socket_url: &str, project_id: &str) -> Result<Self, SocketError> {
        let url = Url::parse(socket_url)?;
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| SocketError::Connect(e.to_string()))?;
        let (mut sink, mut source) = stream.split();

        let join = serde_json::to_string(&JoinFrame::for_project(project_id))
            .map_err(|e| SocketError::Send(e.to_string()))?;
        sink.send(Message::Text(join))
            .await
            .map_err(|e| SocketError::Send(e.to_string()))?;
        debug!(project = %project_id, "joined project channel");

        let (sender, events) = mpsc::unbounded_channel();
        let reader = tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(Message::Text(text)) => match serde_json::from_str::<BoardEvent>(&text) {
                        Ok(event) => {
                            debug!(kind = event.kind(), "relaying board event");
                            if sender.send(event).is_err() {
                                break;
                            }
                        }
                        // Acks and presence frames share the channel;
                        // only the three task events matter here.
                        Err(_) => debug!("ignoring non-task frame"),
                    },
                    Ok(Message::Close(_)) => {
                        debug!("socket closed by server");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "socket read error");
                        break;
                    }
                }
            }
        });

        Ok(Self { events, reader })
    }

    /// Next relayed event; `None` once the connection has ended.
    pub async fn next_event(&mut self) -> Option<BoardEvent> {
        self.events.recv().await
    }

    /// Non-blocking drain, for callers polling on their own tick.
    pub fn try_next_event(&mut self) -> Option<BoardEvent> {
        self.events.try_recv().ok()
    }
}

impl Drop for SocketHandle {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn join_frame_is_keyed_by_project_id() {
        let frame = serde_json::to_value(JoinFrame::for_project("p1")).unwrap();
        assert_eq!(
            frame,
            serde_json::json!({"event":"join_project","data":{"projectId":"p1"}})
        );
    }

    #[test]
    fn task_frames_parse_into_board_events() {
        let event: BoardEvent = serde_json::from_str(
            r#"{"event":"task_updated","data":{"id":"t1","columnId":"doing"}}"#,
        )
        .unwrap();
        assert_eq!(event.kind(), "task_updated");
    }

    #[test]
    fn presence_frames_do_not_parse_as_task_events() {
        let parsed = serde_json::from_str::<BoardEvent>(
            r#"{"event":"member_joined","data":{"email":"dev@x.io"}}"#,
        );
        assert!(parsed.is_err());
    }
}
