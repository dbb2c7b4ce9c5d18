use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::models::{FeedbackEntry, NewFeedbackRequest};

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// What the form and list need from the feedback endpoints.
#[async_trait]
pub trait FeedbackApi: Send + Sync {
    async fn list_recent(&self) -> Result<Vec<FeedbackEntry>, NetworkError>;
    async fn create(&self, req: &NewFeedbackRequest) -> Result<Vec<FeedbackEntry>, NetworkError>;
}

pub struct HttpFeedbackApi {
    client: Client,
    base_url: String,
}

impl HttpFeedbackApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, NetworkError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn feedback_url(&self) -> String {
        format!("{}/api/feedback", self.base_url)
    }

    async fn decode(response: reqwest::Response) -> Result<Vec<FeedbackEntry>, NetworkError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::Status { status, body });
        }

        // A `null` body is treated as an empty list.
        let entries: Option<Vec<FeedbackEntry>> = response.json().await?;
        Ok(entries.unwrap_or_default())
    }
}

#[async_trait]
impl FeedbackApi for HttpFeedbackApi {
    async fn list_recent(&self) -> Result<Vec<FeedbackEntry>, NetworkError> {
        let response = self.client.get(self.feedback_url()).send().await?;
        Self::decode(response).await
    }

    async fn create(&self, req: &NewFeedbackRequest) -> Result<Vec<FeedbackEntry>, NetworkError> {
        let response = self
            .client
            .post(self.feedback_url())
            .json(req)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_url_ignores_trailing_slash() {
        let api = HttpFeedbackApi::new("http://localhost:3000/").unwrap();
        assert_eq!(api.feedback_url(), "http://localhost:3000/api/feedback");
    }
}
