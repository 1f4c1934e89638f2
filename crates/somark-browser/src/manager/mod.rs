//! Browser instance manager.
//!
//! Launches Chrome with remote debugging when nothing is listening on the
//! configured port, connects the CDP client and hands out page sessions.

mod manager_core;
mod manager_pages;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
