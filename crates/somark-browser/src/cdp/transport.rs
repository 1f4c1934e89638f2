//! The write half of the DevTools socket and reply bookkeeping.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::SplitSink;
use futures::SinkExt;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::trace;

use super::error::CdpError;
use super::protocol::{CdpMessage, CdpRequest};

pub(crate) type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Longest a single command may wait for its reply.
pub(crate) const CALL_TIMEOUT: Duration = Duration::from_secs(30);

type Reply = Result<Value, CdpError>;

/// Commands sent and not answered yet, by id.
#[derive(Default)]
pub(crate) struct PendingTable {
    waiting: Mutex<HashMap<u64, (String, oneshot::Sender<Reply>)>>,
}

impl PendingTable {
    pub(crate) fn register(&self, id: u64, method: &str) -> oneshot::Receiver<Reply> {
        let (tx, rx) = oneshot::channel();
        self.waiting.lock().insert(id, (method.to_string(), tx));
        rx
    }

    pub(crate) fn forget(&self, id: u64) {
        self.waiting.lock().remove(&id);
    }

    /// Hand a reply to whoever sent the command. Unknown ids are dropped.
    pub(crate) fn resolve(&self, reply: CdpMessage) {
        let Some(id) = reply.id else {
            return;
        };
        let Some((method, tx)) = self.waiting.lock().remove(&id) else {
            trace!("No caller for reply {}", id);
            return;
        };
        let result = match reply.error {
            Some(error) => Err(CdpError::Remote {
                method,
                code: error.code,
                message: error.message,
            }),
            None => Ok(reply.result.unwrap_or(Value::Null)),
        };
        let _ = tx.send(result);
    }

    /// Fail every waiting call with [`CdpError::Closed`].
    pub(crate) fn abandon_all(&self) {
        self.waiting.lock().clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.waiting.lock().len()
    }
}

/// Shared by the browser connection and all of its page sessions.
pub(crate) struct Transport {
    sink: tokio::sync::Mutex<SplitSink<Socket, Message>>,
    pub(crate) pending: PendingTable,
    next_id: AtomicU64,
}

impl Transport {
    pub(crate) fn new(sink: SplitSink<Socket, Message>) -> Self {
        Self {
            sink: tokio::sync::Mutex::new(sink),
            pending: PendingTable::default(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Send `method` and wait for its reply, addressed to the page session
    /// `session_id` or to the browser itself.
    pub(crate) async fn send(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let frame = serde_json::to_string(&CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(str::to_string),
        })?;
        trace!("-> {}", frame);

        let reply = self.pending.register(id, method);
        let sent = self.sink.lock().await.send(Message::Text(frame.into())).await;
        if let Err(e) = sent {
            self.pending.forget(id);
            return Err(e.into());
        }

        match tokio::time::timeout(CALL_TIMEOUT, reply).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::Closed),
            Err(_) => {
                self.pending.forget(id);
                Err(CdpError::Timeout(format!("reply to {}", method)))
            }
        }
    }
}
