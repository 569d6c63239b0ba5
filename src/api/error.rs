use serde_json::Value;
use std::fmt;

/// Failure of a single list operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// The server answered with a non-success status
    Rejected {
        status: u16,
        /// Canonical reason phrase for the status, if known
        reason: Option<String>,
        /// Human readable message extracted from the error payload
        message: Option<String>,
    },
    /// The request never completed
    Transport(String),
    /// The server answered but the body could not be understood
    Decode(String),
}

impl ListError {
    /// Build a rejection from a status code and the raw response body
    pub fn rejected(status: u16, reason: Option<&str>, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| extract_error_message(&json));

        ListError::Rejected {
            status,
            reason: reason.map(str::to_string),
            message,
        }
    }

    /// Text shown to the user after the "Error: " prefix
    pub fn display_text(&self) -> String {
        match self {
            ListError::Rejected { status, reason, message } => message
                .clone()
                .or_else(|| reason.clone())
                .unwrap_or_else(|| format!("HTTP {}", status)),
            ListError::Transport(text) | ListError::Decode(text) => text.clone(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ListError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::Rejected { status, .. } => {
                write!(f, "request rejected with status {}: {}", status, self.display_text())
            }
            ListError::Transport(text) => write!(f, "transport failure: {}", text),
            ListError::Decode(text) => write!(f, "unreadable response: {}", text),
        }
    }
}

impl std::error::Error for ListError {}

impl From<reqwest::Error> for ListError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ListError::Decode(err.to_string())
        } else {
            ListError::Transport(err.to_string())
        }
    }
}

/// Pull the message out of the error envelopes SharePoint returns.
///
/// Handles `{"error":{"message":{"value":..}}}`, the `odata.error` variant used
/// with `odata=nometadata`, and OData v4's `{"error":{"message":".."}}`.
pub fn extract_error_message(json: &Value) -> Option<String> {
    let error = json.get("error").or_else(|| json.get("odata.error"))?;
    let message = error.get("message")?;

    let text = match message {
        Value::String(text) => text.as_str(),
        Value::Object(_) => message.get("value")?.as_str()?,
        _ => return None,
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
