use super::constants::{self, headers};
use super::error::ListError;
use super::logging::{ApiLogger, OperationContext};
use super::models::ChoiceField;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// The two list operations the feedback form depends on.
///
/// Kept object safe so hosts can hand the form an `Arc<dyn ListClient>` and
/// tests can substitute a scripted implementation.
#[async_trait]
pub trait ListClient: Send + Sync {
    /// Read the choice values and selection mode of one column
    async fn fetch_choice_field(&self, list: &str, field: &str) -> Result<ChoiceField, ListError>;

    /// Create one item in the list from a JSON object
    async fn create_item(&self, list: &str, payload: &Value) -> Result<(), ListError>;
}

/// SharePoint REST client bound to one site
#[derive(Clone)]
pub struct SharePointClient {
    site_url: String,
    http_client: reqwest::Client,
    access_token: Option<String>,
    api_logger: ApiLogger,
}

impl SharePointClient {
    pub fn new(
        site_url: impl Into<String>,
        access_token: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("floating-feedback/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_custom_client(site_url, access_token, http_client))
    }

    /// Create a client around an existing HTTP client
    pub fn with_custom_client(
        site_url: impl Into<String>,
        access_token: Option<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            site_url: site_url.into(),
            http_client,
            access_token: access_token.filter(|token| !token.trim().is_empty()),
            api_logger: ApiLogger::default(),
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn request_headers(&self, correlation_id: &str, with_body: bool) -> HashMap<String, String> {
        let mut request_headers = HashMap::new();
        request_headers.insert("Accept".to_string(), headers::JSON_NO_METADATA.to_string());
        if with_body {
            request_headers.insert("Content-Type".to_string(), headers::JSON_NO_METADATA.to_string());
            request_headers.insert(headers::ODATA_VERSION.to_string(), headers::ODATA_VERSION_UNSET.to_string());
        }
        if self.access_token.is_some() {
            request_headers.insert("Authorization".to_string(), "Bearer".to_string());
        }
        request_headers.insert(headers::X_CORRELATION_ID.to_string(), correlation_id.to_string());
        request_headers
    }

    async fn send_fetch(&self, url: &str, context: &OperationContext) -> Result<ChoiceField, ListError> {
        let request_start = Instant::now();
        let response = self
            .authorize(self.http_client.get(url))
            .header("Accept", headers::JSON_NO_METADATA)
            .header(headers::X_CORRELATION_ID, &context.correlation_id)
            .send()
            .await?;

        self.api_logger
            .log_response(context, response.status().as_u16(), request_start.elapsed());

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let field: ChoiceField = response.json().await?;
        Ok(field)
    }

    async fn send_create(
        &self,
        url: &str,
        payload: &Value,
        context: &OperationContext,
    ) -> Result<(), ListError> {
        let request_start = Instant::now();
        let response = self
            .authorize(self.http_client.post(url))
            .header("Accept", headers::JSON_NO_METADATA)
            .header("Content-Type", headers::JSON_NO_METADATA)
            .header(headers::ODATA_VERSION, headers::ODATA_VERSION_UNSET)
            .header(headers::X_CORRELATION_ID, &context.correlation_id)
            .body(payload.to_string())
            .send()
            .await?;

        self.api_logger
            .log_response(context, response.status().as_u16(), request_start.elapsed());

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::rejection(response).await)
        }
    }

    /// Turn a non-success response into a rejection carrying the server's message
    async fn rejection(response: reqwest::Response) -> ListError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ListError::rejected(status.as_u16(), status.canonical_reason(), &body)
    }
}

#[async_trait]
impl ListClient for SharePointClient {
    async fn fetch_choice_field(&self, list: &str, field: &str) -> Result<ChoiceField, ListError> {
        let url = constants::choice_field_endpoint(&self.site_url, list, field);
        let context = self.api_logger.start_operation("fetch_field", list);
        self.api_logger.log_request(
            &context,
            "GET",
            &url,
            &self.request_headers(&context.correlation_id, false),
        );

        let result = self.send_fetch(&url, &context).await;

        let error_text = result.as_ref().err().map(|e| e.to_string());
        self.api_logger.complete_operation(&context, error_text.as_deref());
        result
    }

    async fn create_item(&self, list: &str, payload: &Value) -> Result<(), ListError> {
        let url = constants::items_endpoint(&self.site_url, list);
        let context = self.api_logger.start_operation("create_item", list);
        self.api_logger.log_request(
            &context,
            "POST",
            &url,
            &self.request_headers(&context.correlation_id, true),
        );

        let result = self.send_create(&url, payload, &context).await;

        let error_text = result.as_ref().err().map(|e| e.to_string());
        self.api_logger.complete_operation(&context, error_text.as_deref());
        result
    }
}
