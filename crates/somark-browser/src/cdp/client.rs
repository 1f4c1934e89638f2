//! Browser-level DevTools connection.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::SplitStream;
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, trace, warn};
use url::Url;

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpMessage};
use super::session::PageSession;
use super::transport::{Socket, Transport};

/// Event senders by session id.
type Routes = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<CdpMessage>>>>;

/// One WebSocket to the browser with every page session multiplexed on it.
pub struct CdpClient {
    transport: Arc<Transport>,
    routes: Routes,
    reader: JoinHandle<()>,
}

impl CdpClient {
    /// Connect through the HTTP endpoint Chrome was started with, e.g.
    /// `http://localhost:9222`.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let endpoint = Url::parse(endpoint)?.as_str().trim_end_matches('/').to_string();
        let version = discover(&endpoint).await?;
        debug!("Found {} at {}", version.browser, endpoint);

        let (socket, _) = tokio_tungstenite::connect_async(version.web_socket_debugger_url.as_str())
            .await
            .map_err(|e| CdpError::Connect(e.to_string()))?;
        let (sink, stream) = socket.split();

        let transport = Arc::new(Transport::new(sink));
        let routes = Routes::default();
        let reader = tokio::spawn(read_loop(stream, transport.clone(), routes.clone()));

        Ok(Self {
            transport,
            routes,
            reader,
        })
    }

    /// Browser-level command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.send(method, params, None).await
    }

    /// Open a blank tab and attach a flat session to it.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        let created = self
            .call("Target.createTarget", Some(json!({"url": "about:blank"})))
            .await?;
        let target_id = string_field(&created, "targetId")?;

        let attached = self
            .call(
                "Target.attachToTarget",
                Some(json!({"targetId": target_id, "flatten": true})),
            )
            .await?;
        let session_id = string_field(&attached, "sessionId")?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        self.routes.write().await.insert(session_id.clone(), events_tx);
        let session = PageSession::new(target_id, session_id, self.transport.clone(), events_rx);

        if let Err(e) = session.enable_domains().await {
            let _ = self.close_page(&session).await;
            return Err(e);
        }
        debug!("Attached session {} to {}", session.session_id(), session.target_id());
        Ok(session)
    }

    /// Close the tab behind `session` and stop routing its events.
    pub async fn close_page(&self, session: &PageSession) -> Result<(), CdpError> {
        self.routes.write().await.remove(session.session_id());
        self.call(
            "Target.closeTarget",
            Some(json!({"targetId": session.target_id()})),
        )
        .await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn discover(endpoint: &str) -> Result<BrowserVersion, CdpError> {
    let unreachable = |e: reqwest::Error| CdpError::Unreachable {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    };
    reqwest::get(format!("{}/json/version", endpoint))
        .await
        .map_err(unreachable)?
        .json()
        .await
        .map_err(unreachable)
}

fn string_field(value: &Value, key: &str) -> Result<String, CdpError> {
    value[key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CdpError::Unexpected(format!("no {} in {}", key, value)))
}

/// Route replies to their callers and events to their sessions until the
/// socket closes.
async fn read_loop(mut stream: SplitStream<Socket>, transport: Arc<Transport>, routes: Routes) {
    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                debug!("DevTools socket closed");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                error!("DevTools socket failed: {}", e);
                break;
            }
        };
        trace!("<- {}", text);

        let message: CdpMessage = match serde_json::from_str(&text) {
            Ok(message) => message,
            Err(e) => {
                warn!("Unparseable DevTools frame: {}", e);
                continue;
            }
        };
        if message.id.is_some() {
            transport.pending.resolve(message);
        } else if message.method.is_some() {
            let key = message.session_id.clone().unwrap_or_default();
            if let Some(route) = routes.read().await.get(&key) {
                let _ = route.send(message);
            }
        }
    }

    transport.pending.abandon_all();
}
