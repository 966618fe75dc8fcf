//! Per-connection read loop.
//!
//! Each connection runs in its own task and owns nothing shared except the
//! message sink. Frames are handled one at a time, so lines from a single
//! connection are logged in arrival order.

use std::borrow::Cow;
use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::StreamExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::message_log::MessageLog;

/// Runs the read loop for a single WebSocket connection until the peer
/// closes it or the transport fails.
///
/// Nothing is ever sent back; pings are answered by axum itself.
pub async fn run_connection(
    mut socket: WebSocket,
    message_log: Arc<dyn MessageLog>,
    peer: SocketAddr,
) {
    let span = tracing::debug_span!("ws_connection", conn_id = %Uuid::new_v4(), %peer);

    async move {
        tracing::debug!("ws connection opened");

        while let Some(frame) = socket.next().await {
            match frame {
                Ok(msg) => {
                    if handle_message(&msg, message_log.as_ref()).is_break() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::debug!(error = %err, "ws transport error");
                    break;
                }
            }
        }

        tracing::debug!("ws connection closed");
    }
    .instrument(span)
    .await;
}

/// Handles one inbound frame.
///
/// Text and binary frames are written to `message_log`; binary payloads are
/// decoded as lossy UTF-8. Returns [`ControlFlow::Break`] on a close frame.
/// A failed write is reported but keeps the connection open.
pub fn handle_message(msg: &Message, message_log: &dyn MessageLog) -> ControlFlow<()> {
    let payload = match msg {
        Message::Text(text) => Cow::Borrowed(text.as_str()),
        Message::Binary(data) => String::from_utf8_lossy(data.as_ref()),
        Message::Ping(_) | Message::Pong(_) => return ControlFlow::Continue(()),
        Message::Close(_) => return ControlFlow::Break(()),
    };

    if let Err(err) = message_log.record(&payload) {
        tracing::warn!(error = %err, "failed to write message log line");
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::message_log::MemoryLog;

    #[derive(Debug)]
    struct FailingLog;

    impl MessageLog for FailingLog {
        fn record(&self, _payload: &str) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn text_frame_is_logged_verbatim() {
        let log = MemoryLog::new();
        let flow = handle_message(&Message::text("hello world"), &log);
        assert!(flow.is_continue());
        assert_eq!(log.lines(), vec!["received: hello world"]);
    }

    #[test]
    fn binary_frame_is_logged_as_lossy_utf8() {
        let log = MemoryLog::new();
        assert!(handle_message(&Message::binary(b"bytes".to_vec()), &log).is_continue());
        assert!(handle_message(&Message::binary(vec![b'a', 0xff, b'b']), &log).is_continue());
        assert_eq!(log.lines(), vec!["received: bytes", "received: a\u{fffd}b"]);
    }

    #[test]
    fn control_frames_are_not_logged() {
        let log = MemoryLog::new();
        assert!(handle_message(&Message::Ping(Vec::new().into()), &log).is_continue());
        assert!(handle_message(&Message::Pong(Vec::new().into()), &log).is_continue());
        assert!(log.is_empty());
    }

    #[test]
    fn close_frame_stops_the_loop() {
        let log = MemoryLog::new();
        assert!(handle_message(&Message::Close(None), &log).is_break());
        assert!(log.is_empty());
    }

    #[test]
    fn write_failure_keeps_connection_open() {
        assert!(handle_message(&Message::text("lost"), &FailingLog).is_continue());
    }

    #[test]
    fn sequential_frames_keep_order() {
        let log = MemoryLog::new();
        for i in 0..5 {
            assert!(handle_message(&Message::text(format!("msg {i}")), &log).is_continue());
        }
        let expected: Vec<String> = (0..5).map(|i| format!("received: msg {i}")).collect();
        assert_eq!(log.lines(), expected);
    }
}
