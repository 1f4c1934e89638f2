//! Chrome DevTools Protocol client.
//!
//! One WebSocket per browser; page sessions are attached in flat mode and
//! share it. Only the domains capture needs are wrapped: targets, page
//! navigation and screenshots, runtime evaluation, network responses and
//! device-metrics emulation.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let page = client.new_page().await?;
//! let nav = page.navigate("https://example.com").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;
mod transport;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::{Navigation, PageSession};
