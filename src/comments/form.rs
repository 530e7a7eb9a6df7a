//! Comment form state
//!
//! A form starts `Idle` and moves to `Submitted` only after the write endpoint
//! accepts the submission. There is no way back to `Idle`. Failed writes are
//! logged and leave the form as it was.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::client::CommentSink;

/// Raw form input, as posted by the browser
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommentInput {
    /// Hidden post id field
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub comment: String,
}

/// Payload of the write call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSubmission {
    #[serde(rename = "_id")]
    pub post_id: String,
    pub name: String,
    pub email: String,
    pub comment: String,
}

/// Required visible fields, in the order their messages are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Comment,
    Email,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Comment => "Comment",
            Field::Email => "Email",
        }
    }
}

/// A missing required field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The {} Field is required", self.field.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitted,
}

/// Result of one submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Required fields missing, nothing was sent
    Invalid,
    /// The endpoint accepted the comment
    Submitted,
    /// The write failed, the form stays idle
    Failed,
    /// The form was already submitted, nothing was sent
    Ignored,
}

/// Comment form bound to one post
#[derive(Debug, Clone)]
pub struct CommentForm {
    post_id: String,
    state: SubmissionState,
    values: CommentInput,
    errors: Vec<FieldError>,
}

impl CommentForm {
    pub fn new(post_id: &str) -> Self {
        Self {
            post_id: post_id.to_string(),
            state: SubmissionState::Idle,
            values: CommentInput {
                id: post_id.to_string(),
                ..CommentInput::default()
            },
            errors: Vec::new(),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Values to show in the form fields
    pub fn values(&self) -> &CommentInput {
        &self.values
    }

    /// Inline messages from the last validation
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Check the required fields of an input
    pub fn validate(input: &CommentInput) -> Vec<FieldError> {
        [
            (Field::Name, &input.name),
            (Field::Comment, &input.comment),
            (Field::Email, &input.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| FieldError { field })
        .collect()
    }

    /// Validate, then send the comment and update the state
    pub async fn submit(&mut self, input: CommentInput, sink: &dyn CommentSink) -> SubmissionOutcome {
        if self.state == SubmissionState::Submitted {
            return SubmissionOutcome::Ignored;
        }

        if input.id != self.post_id {
            tracing::debug!(
                "Ignoring posted id {:?}, form belongs to {}",
                input.id,
                self.post_id
            );
        }

        self.values = CommentInput {
            id: self.post_id.clone(),
            ..input
        };
        self.errors = Self::validate(&self.values);
        if !self.errors.is_empty() {
            return SubmissionOutcome::Invalid;
        }

        let submission = CommentSubmission {
            post_id: self.post_id.clone(),
            name: self.values.name.clone(),
            email: self.values.email.clone(),
            comment: self.values.comment.clone(),
        };

        match sink.create_comment(&submission).await {
            Ok(()) => {
                tracing::info!("Comment submitted for post {}", self.post_id);
                self.state = SubmissionState::Submitted;
                SubmissionOutcome::Submitted
            }
            Err(e) => {
                tracing::error!("Failed to submit comment for post {}: {}", self.post_id, e);
                SubmissionOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::testing::ScriptedSink;

    fn input(name: &str, email: &str, comment: &str) -> CommentInput {
        CommentInput {
            id: "p1".to_string(),
            name: name.to_string(),
            email: email.to_string(),
            comment: comment.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_name_blocks_submission() {
        let sink = ScriptedSink::succeeding();
        let mut form = CommentForm::new("p1");

        let outcome = form.submit(input("", "a@b.com", "hi"), &sink).await;

        assert_eq!(outcome, SubmissionOutcome::Invalid);
        let messages: Vec<String> = form.errors().iter().map(|e| e.to_string()).collect();
        assert_eq!(messages, vec!["The Name Field is required"]);
        assert_eq!(form.state(), SubmissionState::Idle);
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_validation_order() {
        let errors = CommentForm::validate(&input(" ", "", ""));
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![Field::Name, Field::Comment, Field::Email]);
    }

    #[tokio::test]
    async fn test_successful_submission() {
        let sink = ScriptedSink::succeeding();
        let mut form = CommentForm::new("p1");

        let outcome = form.submit(input("Ana", "a@b.com", "hi"), &sink).await;

        assert_eq!(outcome, SubmissionOutcome::Submitted);
        assert_eq!(form.state(), SubmissionState::Submitted);
        assert_eq!(
            sink.calls(),
            vec![CommentSubmission {
                post_id: "p1".to_string(),
                name: "Ana".to_string(),
                email: "a@b.com".to_string(),
                comment: "hi".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_failed_submission_stays_idle() {
        let sink = ScriptedSink::failing();
        let mut form = CommentForm::new("p1");

        let outcome = form.submit(input("Ana", "a@b.com", "hi"), &sink).await;

        assert_eq!(outcome, SubmissionOutcome::Failed);
        assert_eq!(form.state(), SubmissionState::Idle);
        assert!(form.errors().is_empty());
        assert_eq!(form.values().comment, "hi");
    }

    #[tokio::test]
    async fn test_submitted_is_terminal() {
        let sink = ScriptedSink::succeeding();
        let mut form = CommentForm::new("p1");
        form.submit(input("Ana", "a@b.com", "hi"), &sink).await;

        let outcome = form.submit(input("Ana", "a@b.com", "again"), &sink).await;

        assert_eq!(outcome, SubmissionOutcome::Ignored);
        assert_eq!(form.state(), SubmissionState::Submitted);
        assert_eq!(sink.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_post_id_is_not_taken_from_input() {
        let sink = ScriptedSink::succeeding();
        let mut form = CommentForm::new("p1");
        let mut tampered = input("Ana", "a@b.com", "hi");
        tampered.id = "other".to_string();

        form.submit(tampered, &sink).await;

        assert_eq!(sink.calls()[0].post_id, "p1");
    }

    #[test]
    fn test_submission_json_shape() {
        let submission = CommentSubmission {
            post_id: "p1".to_string(),
            name: "Ana".to_string(),
            email: "a@b.com".to_string(),
            comment: "hi".to_string(),
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"_id": "p1", "name": "Ana", "email": "a@b.com", "comment": "hi"})
        );
    }
}
