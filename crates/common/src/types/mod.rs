use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
    /// ISO 8601 instant the probe was answered at
    pub timestamp: String,
}

impl Health {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }
}

/// Service identification returned from the root route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub app: String,
    pub message: String,
    pub endpoint: String,
    pub host: String,
}

/// Response wrapper shared by every users route.
///
/// `message` and `count` are omitted from the JSON when unset, so a plain
/// lookup serializes as `{"success":true,"data":{...}}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, message: None, data: Some(data), count: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl Envelope<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()), data: None, count: None }
    }
}
