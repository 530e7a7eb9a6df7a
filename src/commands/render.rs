//! Render a single post

use anyhow::{bail, Result};

use crate::comments::CommentForm;
use crate::PostView;

/// Render the page for one slug, failing if the post does not exist
pub async fn run(app: &PostView, slug: &str) -> Result<String> {
    let Some(post) = app.static_props(slug).await? else {
        bail!("Post not found: {}", slug);
    };

    let form = CommentForm::new(&post.id);
    Ok(app.renderer.render_post(&post, &form)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::testing::ScriptedSink;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_render_existing_post() {
        let dir = tempfile::tempdir().unwrap();
        let app = crate::testing::app(dir.path(), Arc::new(ScriptedSink::succeeding()));

        let html = run(&app, "hello-world").await.unwrap();
        assert!(html.contains("Hello World"));
        assert!(html.contains("Great post!"));
        assert!(!html.contains("Pending"));
    }

    #[tokio::test]
    async fn test_render_missing_post_fails() {
        let dir = tempfile::tempdir().unwrap();
        let app = crate::testing::app(dir.path(), Arc::new(ScriptedSink::succeeding()));

        let err = run(&app, "nope").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
