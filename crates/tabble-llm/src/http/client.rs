use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::config::ChatClientConfig;
use crate::error::{ChatError, Result};
use crate::streaming::ByteStream;
use crate::traits::{ChatClient, ChatRequest};

/// Chat client talking to `POST /api/chat`
pub struct HttpChatClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpChatClient {
    pub fn new(config: ChatClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(ChatError::Network)?;

        Ok(Self {
            http_client,
            base_url: config.normalized_base_url().to_string(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn chat_stream(&self, request: ChatRequest) -> Result<ByteStream> {
        let url = self.chat_url();
        tracing::debug!(url = %url, messages = request.messages.len(), "Sending chat request");

        let response = self.http_client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            tracing::error!(status = %status, body = %body, "Chat request failed");
            return Err(ChatError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ChatError::Network));
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpChatClient::new(ChatClientConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(client.chat_url(), "http://localhost:8000/api/chat");
    }
}
