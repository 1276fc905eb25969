//! The response envelope wrapped around most server payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server response wrapper: `{ success, data?, error?, message?, timestamp }`.
///
/// A body matches the envelope shape when it is a JSON object with a boolean
/// `success` field. Anything else is passed through untouched by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    /// Whether the server handled the request successfully.
    pub success: bool,
    /// Payload, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error text, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Informational message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Server timestamp, kept as received.
    #[serde(default)]
    pub timestamp: String,
}

impl Envelope<Value> {
    /// Reads the envelope fields out of `body` without consuming it.
    ///
    /// Returns `None` when the body does not match the envelope shape. Fields
    /// with an unexpected type are treated as absent.
    pub fn detect(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let success = object.get("success")?.as_bool()?;
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);

        Some(Self {
            success,
            data: object.get("data").cloned(),
            error: text("error"),
            message: text("message"),
            timestamp: text("timestamp").unwrap_or_default(),
        })
    }
}
