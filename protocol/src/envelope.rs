use crate::node::BreadcrumbEntry;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Wrapper every document-service response arrives in.
///
/// `data` stays untyped until `success` has been checked so that a failed
/// call with an unexpected payload still reports the server's error rather
/// than a decode failure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl Envelope {
    /// Error text, whether the server sent a plain string or an object.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(Value::String(message)) => message.clone(),
            Some(Value::Object(fields)) => fields
                .get("message")
                .or_else(|| fields.get("detail"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(fields.clone()).to_string()),
            Some(Value::Null) | None => self
                .message
                .clone()
                .unwrap_or_else(|| "unknown error".to_string()),
            Some(other) => other.to_string(),
        }
    }

    /// Breadcrumb carried in `metadata.breadcrumb`; empty when absent or
    /// malformed.
    pub fn breadcrumb(&self) -> Vec<BreadcrumbEntry> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.get("breadcrumb"))
            .cloned()
            .and_then(|raw| serde_json::from_value(raw).ok())
            .unwrap_or_default()
    }
}
