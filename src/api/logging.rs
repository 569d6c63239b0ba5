//! Structured request logging with correlation tracking
//!
//! Every list operation gets a correlation id which is sent to the server and
//! attached to each log line, so a failed submission can be matched against
//! the server-side ULS logs.

use log::{debug, info, warn};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Structured logger for list operations
#[derive(Debug, Clone)]
pub struct ApiLogger {
    request_logging: bool,
}

/// Context for a single list operation
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub correlation_id: String,
    /// Operation type (fetch_field, create_item)
    pub operation_type: String,
    /// List the operation targets
    pub list: String,
    pub start_time: Instant,
}

impl OperationContext {
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for ApiLogger {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ApiLogger {
    pub fn new(request_logging: bool) -> Self {
        Self { request_logging }
    }

    /// Start tracking a new operation with a fresh correlation id
    pub fn start_operation(&self, operation_type: &str, list: &str) -> OperationContext {
        let context = OperationContext {
            correlation_id: uuid::Uuid::new_v4().to_string(),
            operation_type: operation_type.to_string(),
            list: list.to_string(),
            start_time: Instant::now(),
        };

        if self.request_logging {
            let log_data = json!({
                "event": "operation_started",
                "correlation_id": context.correlation_id,
                "operation_type": context.operation_type,
                "list": context.list,
                "timestamp": chrono::Utc::now().to_rfc3339()
            });
            debug!("List Operation Started: {}", log_data);
        }

        context
    }

    /// Log HTTP request details
    pub fn log_request(
        &self,
        context: &OperationContext,
        method: &str,
        url: &str,
        headers: &HashMap<String, String>,
    ) {
        if !self.request_logging {
            return;
        }

        let log_data = json!({
            "event": "http_request",
            "correlation_id": context.correlation_id,
            "operation_type": context.operation_type,
            "method": method,
            "url": url,
            "headers": sanitize_headers(headers),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        debug!("HTTP Request: {}", log_data);
    }

    /// Log HTTP response status and timing
    pub fn log_response(&self, context: &OperationContext, status_code: u16, duration: Duration) {
        if !self.request_logging {
            return;
        }

        let log_data = json!({
            "event": "http_response",
            "correlation_id": context.correlation_id,
            "operation_type": context.operation_type,
            "status_code": status_code,
            "duration_ms": duration.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if status_code >= 400 {
            warn!("HTTP Response (Error): {}", log_data);
        } else {
            debug!("HTTP Response: {}", log_data);
        }
    }

    /// Log the final outcome of an operation
    pub fn complete_operation(&self, context: &OperationContext, error: Option<&str>) {
        let log_data = json!({
            "event": "operation_completed",
            "correlation_id": context.correlation_id,
            "operation_type": context.operation_type,
            "list": context.list,
            "success": error.is_none(),
            "error": error,
            "duration_ms": context.elapsed().as_millis(),
        });

        match error {
            None => info!("List Operation Completed: {}", log_data),
            Some(_) => warn!("List Operation Failed: {}", log_data),
        }
    }
}

/// Redact credentials before headers reach the log
pub fn sanitize_headers(headers: &HashMap<String, String>) -> Value {
    let sanitized: serde_json::Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            let lower = name.to_lowercase();
            let shown = if lower == "authorization" || lower == "cookie" {
                "[REDACTED]".to_string()
            } else {
                value.clone()
            };
            (name.clone(), Value::String(shown))
        })
        .collect();

    Value::Object(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_is_redacted() {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), "Bearer secret".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        let sanitized = sanitize_headers(&headers);
        assert_eq!(sanitized["Authorization"], "[REDACTED]");
        assert_eq!(sanitized["Accept"], "application/json");
    }

    #[test]
    fn operations_get_unique_correlation_ids() {
        let logger = ApiLogger::new(false);
        let a = logger.start_operation("create_item", "Feedback");
        let b = logger.start_operation("create_item", "Feedback");
        assert_ne!(a.correlation_id, b.correlation_id);
    }
}
