//! JSON-lines transport.
//!
//! Each inbound line is one [`Event`] object. Each outbound message is one
//! line of the form
//!
//! ```text
//! {"action":"send_direct","user_id":42,"text":"..."}
//! {"action":"post_public","text":"...","in_reply_to":7}
//! ```
//!
//! The daemon wires this to stdin/stdout so a sidecar adapter can bridge any
//! social network.

use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use nastip_types::{MessageId, UserId};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::transport::{Event, Transport, TransportError};

#[derive(Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum OutboundLine<'a> {
    SendDirect {
        user_id: UserId,
        text: &'a str,
    },
    PostPublic {
        text: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        in_reply_to: Option<MessageId>,
    },
}

/// Decode newline-delimited events from `reader`.
///
/// Blank lines are skipped. The stream ends when the reader reaches EOF;
/// a line that is not a valid event yields [`TransportError::Decode`].
pub fn event_stream<R>(reader: R) -> impl Stream<Item = Result<Event, TransportError>>
where
    R: AsyncBufRead + Unpin,
{
    stream::unfold(reader.lines(), |mut lines| async move {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    let event = serde_json::from_str::<Event>(&line)
                        .map_err(|e| TransportError::Decode(e.to_string()));
                    return Some((event, lines));
                }
                Ok(None) => return None,
                Err(e) => return Some((Err(TransportError::Io(e)), lines)),
            }
        }
    })
}

/// Writes outbound messages as JSON lines.
pub struct LineTransport<W> {
    writer: Mutex<W>,
}

impl<W> LineTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    async fn write_line(&self, line: &OutboundLine<'_>) -> Result<(), TransportError> {
        let mut encoded =
            serde_json::to_vec(line).map_err(|e| TransportError::Decode(e.to_string()))?;
        encoded.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&encoded).await?;
        writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<W> Transport for LineTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send_direct(&self, user: UserId, text: &str) -> Result<(), TransportError> {
        self.write_line(&OutboundLine::SendDirect {
            user_id: user,
            text,
        })
        .await
    }

    async fn post_public(
        &self,
        text: &str,
        in_reply_to: Option<MessageId>,
    ) -> Result<(), TransportError> {
        self.write_line(&OutboundLine::PostPublic { text, in_reply_to })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::EventKind;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn reads_events_and_skips_blank_lines() {
        let input = concat!(
            r#"{"kind":"direct_message","message_id":1,"sender_id":5,"sender_handle":"a","text":"help"}"#,
            "\n\n",
            r#"{"kind":"mention","message_id":2,"sender_id":5,"sender_handle":"a","text":"hi"}"#,
            "\n",
        );
        let events: Vec<_> = event_stream(input.as_bytes()).collect().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_ref().unwrap().kind, EventKind::DirectMessage);
        assert_eq!(events[1].as_ref().unwrap().message_id, MessageId(2));
    }

    #[tokio::test]
    async fn malformed_line_is_a_decode_error() {
        let events: Vec<_> = event_stream("not json\n".as_bytes()).collect().await;
        assert!(matches!(events[0], Err(TransportError::Decode(_))));
    }

    #[tokio::test]
    async fn writes_outbound_lines() {
        let transport = LineTransport::new(Vec::new());
        transport.send_direct(UserId(42), "hello").await.unwrap();
        transport.post_public("done", Some(MessageId(7))).await.unwrap();
        transport.post_public("plain", None).await.unwrap();

        let out = String::from_utf8(transport.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            r#"{"action":"send_direct","user_id":42,"text":"hello"}"#
        );
        assert_eq!(
            lines[1],
            r#"{"action":"post_public","text":"done","in_reply_to":7}"#
        );
        assert_eq!(lines[2], r#"{"action":"post_public","text":"plain"}"#);
    }
}
