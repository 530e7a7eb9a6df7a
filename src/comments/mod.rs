//! Comment submission: form validation, the submission state machine and
//! the write endpoint client

mod client;
mod form;

pub use client::{CommentSink, HttpCommentSink, CREATE_COMMENT_PATH};
pub use form::{
    CommentForm, CommentInput, CommentSubmission, Field, FieldError, SubmissionOutcome,
    SubmissionState,
};
