use std::time::Duration;

use crate::dbs::HttpPersistenceClient;
use crate::error::{ApiError, Result};

pub struct PersistClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    user_id: Option<String>,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            user_id: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn build(self) -> Result<HttpPersistenceClient> {
        let base_url = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ApiError::Config("base_url is required".to_string()))?;

        let client = HttpPersistenceClient::new(base_url, self.timeout)?;
        Ok(match self.user_id {
            Some(user_id) => client.with_user_id(user_id),
            None => client,
        })
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let err = PersistClientBuilder::new().build().err().unwrap();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_builder_success() {
        let result = PersistClientBuilder::new()
            .base_url("http://localhost:8000")
            .timeout(Duration::from_secs(5))
            .user_id("user_123")
            .build();
        assert!(result.is_ok());
    }
}
