use super::*;
use std::path::PathBuf;
use std::time::Duration;

use somark_config::BrowserConfig;
use somark_core::AnalysisError;

use crate::cdp::CdpError;

#[test]
fn test_config_default() {
    let config = BrowserManagerConfig::default();
    assert_eq!(config.debug_port, 9222);
    assert!(config.headless);
    assert_eq!(config.launch_timeout, Duration::from_millis(6000));
    assert!(config.chrome_path.is_none());
}

#[test]
fn test_config_from_file_section() {
    let section = BrowserConfig {
        debug_port: 9333,
        headless: false,
        chrome_path: Some(PathBuf::from("/opt/chrome")),
        profile_dir: Some(PathBuf::from("/tmp/profile")),
        launch_timeout_ms: 500,
    };
    let config = BrowserManagerConfig::from(&section);
    assert_eq!(config.debug_port, 9333);
    assert!(!config.headless);
    assert_eq!(config.get_profile_dir(), PathBuf::from("/tmp/profile"));
    assert_eq!(config.launch_timeout, Duration::from_millis(500));
}

#[test]
fn test_config_endpoint() {
    let config = BrowserManagerConfig::default();
    assert_eq!(config.endpoint(), "http://localhost:9222");
}

#[test]
fn test_config_profile_dir_defaults_per_port() {
    let config = BrowserManagerConfig::default();
    assert!(config.get_profile_dir().ends_with("somark-chrome-9222"));
}

#[test]
fn test_browser_error_display() {
    let err = BrowserError::ConnectionFailed("timeout".to_string());
    assert_eq!(err.to_string(), "Cannot reach Chrome: timeout");

    let err = BrowserError::HttpStatus {
        status: 404,
        url: "https://example.com/missing".to_string(),
    };
    assert_eq!(err.to_string(), "Got status 404: https://example.com/missing");

    let err = BrowserError::LaunchFailed("permission denied".to_string());
    assert_eq!(err.to_string(), "Failed to launch Chrome: permission denied");
}

#[test]
fn test_browser_error_from_cdp() {
    let err: BrowserError = CdpError::Timeout("load".to_string()).into();
    assert!(matches!(err, BrowserError::Timeout(_)));

    let err: BrowserError = CdpError::Closed.into();
    assert!(matches!(err, BrowserError::NotConnected));

    let err: BrowserError = CdpError::Script("boom".to_string()).into();
    assert!(matches!(err, BrowserError::ActionFailed(_)));
    assert!(err.to_string().contains("boom"));

    let err: BrowserError = CdpError::Navigation {
        url: "https://example.invalid/".to_string(),
        reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
    }
    .into();
    assert!(matches!(err, BrowserError::NavigationFailed(ref msg) if msg.contains("ERR_NAME_NOT_RESOLVED")));
}

#[test]
fn test_browser_error_from_analysis() {
    let err: BrowserError = AnalysisError::NegativeDepth(-2).into();
    assert!(matches!(err, BrowserError::Analysis(_)));
}

#[test]
fn test_find_chrome() {
    if let Some(path) = BrowserManager::find_chrome() {
        assert!(path.exists());
    }
}

#[test]
fn test_chrome_args() {
    let manager = BrowserManager::new(BrowserManagerConfig {
        debug_port: 9444,
        profile_dir: Some(PathBuf::from("/tmp/somark-profile")),
        ..Default::default()
    });
    let args = manager.chrome_args();
    assert_eq!(args[0], "--remote-debugging-port=9444");
    assert_eq!(args[1], "--user-data-dir=/tmp/somark-profile");
    assert!(args.contains(&"--hide-scrollbars".to_string()));
    assert!(args.contains(&"--headless=new".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("about:blank"));

    let visible = BrowserManager::new(BrowserManagerConfig {
        headless: false,
        ..Default::default()
    });
    assert!(!visible.chrome_args().iter().any(|arg| arg.starts_with("--headless")));
}

#[tokio::test]
async fn test_close_without_connect() {
    let manager = BrowserManager::new(BrowserManagerConfig::default());
    manager.close().await;
    assert!(!manager.is_connected().await);
    assert_eq!(manager.open_pages(), 0);
    assert!(manager.shutdown_chrome().await.is_ok());
}

#[tokio::test]
async fn test_missing_chrome_fails_launch() {
    let manager = BrowserManager::new(BrowserManagerConfig {
        debug_port: 1,
        chrome_path: Some(PathBuf::from("/nonexistent/chrome")),
        profile_dir: None,
        headless: true,
        launch_timeout: Duration::from_millis(100),
    });
    if BrowserManager::find_chrome().is_none() {
        assert!(matches!(manager.connect().await, Err(BrowserError::ChromeNotFound)));
    }
}
