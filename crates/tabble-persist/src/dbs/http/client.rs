use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{ApiError, Result};
use crate::models::{
    MessageCreateRequest, MessageCreateUpdateResponse, MessageListResponse, MessageResponse,
    ThreadCreateRequest, ThreadCreateUpdateResponse, ThreadListResponse, ThreadResponse,
    ThreadUpdateRequest,
};
use crate::trait_client::PersistenceClient;

/// HTTP client for the thread/message REST API
pub struct HttpPersistenceClient {
    client: Client,
    base_url: String,
    user_id: Option<String>,
}

impl HttpPersistenceClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Backend URL (e.g., "http://localhost:8000")
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: None,
        })
    }

    /// Owner recorded on threads created without one
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn builder() -> crate::builder::PersistClientBuilder {
        crate::builder::PersistClientBuilder::new()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a successful body, or turn the status into an error
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            tracing::debug!("Persistence API request successful: {}", status);
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", e, body)))
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());

            tracing::error!(
                "Persistence API request failed: status={}, body={}",
                status,
                body
            );

            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl PersistenceClient for HttpPersistenceClient {
    async fn create_thread(&self, mut request: ThreadCreateRequest) -> Result<ThreadCreateUpdateResponse> {
        if request.user_id.is_none() {
            request.user_id = self.user_id.clone();
        }

        let response = self
            .client
            .post(self.url("/api/thread"))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn update_thread(&self, request: ThreadUpdateRequest) -> Result<ThreadCreateUpdateResponse> {
        let response = self
            .client
            .put(self.url("/api/thread"))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn list_threads(&self) -> Result<Vec<ThreadResponse>> {
        let response = self.client.get(self.url("/api/threads")).send().await?;

        let list: ThreadListResponse = self.handle_response(response).await?;
        Ok(list.threads)
    }

    async fn create_message(&self, request: MessageCreateRequest) -> Result<MessageCreateUpdateResponse> {
        let response = self
            .client
            .post(self.url("/api/message"))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<MessageResponse>> {
        let response = self
            .client
            .get(self.url("/api/messages"))
            .query(&[("thread_id", thread_id)])
            .send()
            .await?;

        let list: MessageListResponse = self.handle_response(response).await?;
        Ok(list.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpPersistenceClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/api/threads"), "http://localhost:8000/api/threads");
    }
}
