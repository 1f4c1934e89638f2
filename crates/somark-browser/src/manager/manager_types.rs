//! Manager errors and launch settings.

use std::path::PathBuf;
use std::time::Duration;

use somark_config::BrowserConfig;
use somark_core::AnalysisError;
use somark_workqueue::QueueError;
use thiserror::Error;

use crate::cdp::CdpError;

/// Everything that can go wrong between launching Chrome and writing output.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Cannot reach Chrome: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// The main document answered with a non-2xx status.
    #[error("Got status {status}: {url}")]
    HttpStatus { status: u16, url: String },

    /// An http(s) load finished without a main document response.
    #[error("No document response for {0}")]
    NoResponse(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Page command failed: {0}")]
    ActionFailed(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not connected to Chrome")]
    NotConnected,

    #[error("Chrome not found. Install Chrome or Chromium, or set browser.chrome_path.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::Unreachable { .. } | CdpError::Connect(_) => BrowserError::ConnectionFailed(e.to_string()),
            CdpError::Navigation { .. } => BrowserError::NavigationFailed(e.to_string()),
            CdpError::Timeout(what) => BrowserError::Timeout(what),
            CdpError::Closed => BrowserError::NotConnected,
            other => BrowserError::ActionFailed(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for BrowserError {
    fn from(e: serde_json::Error) -> Self {
        BrowserError::CaptureFailed(format!("malformed page data: {}", e))
    }
}

/// How to find, start and reach Chrome.
#[derive(Debug, Clone)]
pub struct BrowserManagerConfig {
    /// Port of the DevTools HTTP endpoint.
    pub debug_port: u16,
    /// Searched in the usual install locations when unset.
    pub chrome_path: Option<PathBuf>,
    pub profile_dir: Option<PathBuf>,
    pub headless: bool,
    /// Time a freshly launched Chrome gets to open its endpoint.
    pub launch_timeout: Duration,
}

impl Default for BrowserManagerConfig {
    fn default() -> Self {
        Self::from(&BrowserConfig::default())
    }
}

impl From<&BrowserConfig> for BrowserManagerConfig {
    fn from(config: &BrowserConfig) -> Self {
        Self {
            debug_port: config.debug_port,
            chrome_path: config.chrome_path.clone(),
            profile_dir: config.profile_dir.clone(),
            headless: config.headless,
            launch_timeout: Duration::from_millis(config.launch_timeout_ms),
        }
    }
}

impl BrowserManagerConfig {
    /// Configured profile, or a temporary one per port so parallel runs on
    /// different ports never share a profile lock.
    pub fn get_profile_dir(&self) -> PathBuf {
        self.profile_dir.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("somark-chrome-{}", self.debug_port))
        })
    }

    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }
}
