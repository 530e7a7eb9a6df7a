//! Client for the comment write endpoint

use async_trait::async_trait;

use super::form::CommentSubmission;
use crate::error::{Error, Result};

/// Path of the moderation backend's create endpoint
pub const CREATE_COMMENT_PATH: &str = "/api/createComment";

/// Destination for new comments
#[async_trait]
pub trait CommentSink: Send + Sync {
    /// Send one submission; `Ok` means the endpoint accepted it
    async fn create_comment(&self, submission: &CommentSubmission) -> Result<()>;
}

/// Posts submissions as JSON to `{base}/api/createComment`
pub struct HttpCommentSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCommentSink {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CREATE_COMMENT_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CommentSink for HttpCommentSink {
    async fn create_comment(&self, submission: &CommentSubmission) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(|e| Error::Submission(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Submission(format!("{} - {}", status, body)));
        }

        Ok(())
    }
}
