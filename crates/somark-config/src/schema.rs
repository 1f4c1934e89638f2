//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub marking: MarkingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chrome launch and connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// Chrome executable. Searched in the usual places when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// User data directory. A temporary one is used when unset.
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,

    /// How long to wait for a launched Chrome to accept connections.
    #[serde(default = "default_launch_timeout_ms")]
    pub launch_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: default_true(),
            chrome_path: None,
            profile_dir: None,
            launch_timeout_ms: default_launch_timeout_ms(),
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_true() -> bool {
    true
}

fn default_launch_timeout_ms() -> u64 {
    6000
}

/// Batch marking of many documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Documents processed at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Index of the first URL to process.
    #[serde(default)]
    pub start: usize,

    /// Number of URLs to process; `-1` means all remaining.
    #[serde(default = "default_total")]
    pub total: i64,

    /// Wait after load before the first capture.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Wait after each scroll before capturing.
    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,

    /// Upper bound on the time spent on one document.
    #[serde(default = "default_document_timeout_secs")]
    pub document_timeout_secs: u64,

    /// Use 1920x1080 for every document instead of rotating device viewports.
    #[serde(default)]
    pub fixed_viewport: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            start: 0,
            total: default_total(),
            settle_ms: default_settle_ms(),
            scroll_settle_ms: default_scroll_settle_ms(),
            document_timeout_secs: default_document_timeout_secs(),
            fixed_viewport: false,
        }
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_total() -> i64 {
    -1
}

fn default_settle_ms() -> u64 {
    2000
}

fn default_scroll_settle_ms() -> u64 {
    1500
}

fn default_document_timeout_secs() -> u64 {
    120
}

/// Mark selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkingConfig {
    /// Tree depth to expand when selecting marks.
    #[serde(default = "default_depth")]
    pub depth: i64,
}

impl Default for MarkingConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
        }
    }
}

fn default_depth() -> i64 {
    99
}

/// Log output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for rotated log files. Defaults to `~/.somark/logs`.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// Configured log directory, or `~/.somark/logs`.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".somark")
                .join("logs")
        })
    }
}
