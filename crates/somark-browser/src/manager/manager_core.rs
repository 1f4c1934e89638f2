//! Chrome process and the DevTools connection to it.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cdp::CdpClient;
use super::{BrowserError, BrowserManagerConfig};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Flags for a quiet capture browser with stable rendering.
const CHROME_FLAGS: &[&str] = &[
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-background-networking",
    "--disable-extensions",
    "--disable-sync",
    "--disable-translate",
    "--force-color-profile=srgb",
    "--hide-scrollbars",
    "--mute-audio",
];

#[cfg(target_os = "macos")]
const CHROME_CANDIDATES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

#[cfg(target_os = "linux")]
const CHROME_CANDIDATES: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
];

#[cfg(target_os = "windows")]
const CHROME_CANDIDATES: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const CHROME_CANDIDATES: &[&str] = &[];

/// Owns the Chrome connection shared by all pages of a run.
///
/// Connecting is lazy. The first page launches Chrome when nothing listens on
/// the debug port; pages opened concurrently wait for that one launch.
pub struct BrowserManager {
    pub(super) config: BrowserManagerConfig,
    client: Mutex<Option<Arc<CdpClient>>>,
    pub(super) open_pages: AtomicUsize,
    /// Set only when this manager started Chrome.
    chrome: Mutex<Option<Child>>,
}

impl BrowserManager {
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            client: Mutex::new(None),
            open_pages: AtomicUsize::new(0),
            chrome: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BrowserManagerConfig {
        &self.config
    }

    /// First Chrome or Chromium found in the usual install locations.
    pub fn find_chrome() -> Option<PathBuf> {
        CHROME_CANDIDATES.iter().map(PathBuf::from).find(|p| p.exists())
    }

    fn chrome_executable(&self) -> Result<PathBuf, BrowserError> {
        match &self.config.chrome_path {
            Some(path) if path.exists() => return Ok(path.clone()),
            Some(path) => warn!("Configured Chrome {} does not exist, searching", path.display()),
            None => {}
        }
        Self::find_chrome().ok_or(BrowserError::ChromeNotFound)
    }

    pub(super) fn chrome_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.config.debug_port),
            format!("--user-data-dir={}", self.config.get_profile_dir().display()),
        ];
        args.extend(CHROME_FLAGS.iter().map(|flag| flag.to_string()));
        if self.config.headless {
            args.push("--headless=new".to_string());
        }
        args.push("about:blank".to_string());
        args
    }

    async fn endpoint_alive(&self) -> bool {
        reqwest::get(format!("{}/json/version", self.config.endpoint()))
            .await
            .is_ok_and(|response| response.status().is_success())
    }

    async fn launch_chrome(&self) -> Result<(), BrowserError> {
        let executable = self.chrome_executable()?;
        std::fs::create_dir_all(self.config.get_profile_dir())?;

        info!("Launching {} on port {}", executable.display(), self.config.debug_port);
        let child = Command::new(&executable)
            .args(self.chrome_args())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(format!("{}: {}", executable.display(), e)))?;
        *self.chrome.lock().await = Some(child);

        let started = Instant::now();
        while !self.endpoint_alive().await {
            if started.elapsed() >= self.config.launch_timeout {
                return Err(BrowserError::LaunchFailed(format!(
                    "no DevTools endpoint on port {} after {:?}",
                    self.config.debug_port, self.config.launch_timeout
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        Ok(())
    }

    /// The connected client, launching Chrome first if needed.
    pub(super) async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        let mut slot = self.client.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        if self.endpoint_alive().await {
            info!("Using Chrome already listening on port {}", self.config.debug_port);
        } else {
            self.launch_chrome().await?;
        }
        let client = Arc::new(CdpClient::connect(&self.config.endpoint()).await?);
        info!("Connected to Chrome at {}", self.config.endpoint());
        *slot = Some(client.clone());
        Ok(client)
    }

    /// The client if already connected; never launches anything.
    pub(super) async fn connected(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.client.lock().await.clone().ok_or(BrowserError::NotConnected)
    }

    /// Connect now instead of on the first page.
    pub async fn connect(&self) -> Result<(), BrowserError> {
        self.client().await.map(|_| ())
    }

    pub async fn is_connected(&self) -> bool {
        self.client.lock().await.is_some()
    }

    /// Drop the connection. Chrome keeps running.
    pub async fn close(&self) {
        if self.client.lock().await.take().is_some() {
            info!("Disconnected from Chrome");
        }
    }

    /// Drop the connection and stop Chrome if this manager launched it.
    pub async fn shutdown_chrome(&self) -> Result<(), BrowserError> {
        self.close().await;
        if let Some(mut child) = self.chrome.lock().await.take() {
            info!("Stopping Chrome");
            child.kill().await?;
        }
        Ok(())
    }
}
