//! Page script loader.

/// Installs `window.__somark` unless the current document already has it.
pub(super) const CAPTURE_SCRIPT: &str = include_str!("capture_script.js");

/// Call `function` on the installed page object with JSON-encoded `args`.
pub(super) fn invoke(function: &str, args: &str) -> String {
    format!("window.__somark.{}({})", function, args)
}
