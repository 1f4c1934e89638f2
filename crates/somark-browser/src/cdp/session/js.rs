//! Script evaluation.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate `expression` in the page and return its JSON value. Promises
    /// are awaited.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let mut result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            return Err(CdpError::Script(exception_text(exception)));
        }
        Ok(result
            .pointer_mut("/result/value")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

/// The thrown error's description, or the generic text when nothing was thrown
/// with one.
pub(super) fn exception_text(exception: &Value) -> String {
    exception["exception"]["description"]
        .as_str()
        .or_else(|| exception["text"].as_str())
        .unwrap_or("unknown exception")
        .to_string()
}
