//! Session struct and command dispatch.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::CdpMessage;
use crate::cdp::transport::Transport;

/// A flat-mode session attached to one tab.
pub struct PageSession {
    pub(super) target_id: String,
    pub(super) session_id: String,
    transport: Arc<Transport>,
    /// Events the client routed here. Locked by whoever waits on them.
    pub(super) events: Mutex<mpsc::UnboundedReceiver<CdpMessage>>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        transport: Arc<Transport>,
        events: mpsc::UnboundedReceiver<CdpMessage>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            transport,
            events: Mutex::new(events),
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a command to this tab.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.send(method, params, Some(&self.session_id)).await
    }

    /// Turn on the event domains navigation waits on.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        for domain in ["Page", "Runtime", "Network"] {
            self.call(&format!("{}.enable", domain), None).await?;
        }
        debug!("Domains enabled for {}", self.session_id);
        Ok(())
    }
}
