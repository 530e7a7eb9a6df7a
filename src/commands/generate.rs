//! Pre-render every known post to static files

use anyhow::Result;
use std::fs;

use crate::comments::CommentForm;
use crate::PostView;

/// Render each enumerated slug into `public/post/<slug>/index.html`
///
/// Returns the number of pages written. Slugs whose post has disappeared
/// between enumeration and fetch are skipped, and the index only links to
/// pages that were written.
pub async fn run(app: &PostView) -> Result<usize> {
    let start = std::time::Instant::now();

    let slugs = app.static_paths().await?;
    tracing::info!("Found {} post paths", slugs.len());

    fs::create_dir_all(&app.public_dir)?;

    let mut written = Vec::with_capacity(slugs.len());
    for slug in &slugs {
        if slug.contains('/') || slug.contains('\\') || slug.starts_with('.') {
            tracing::warn!("Skipping unsafe slug {:?}", slug);
            continue;
        }

        let Some(post) = app.static_props(slug).await? else {
            tracing::warn!("Post {} vanished during generation, skipping", slug);
            continue;
        };

        let html = app.renderer.render_post(&post, &CommentForm::new(&post.id))?;

        let output_path = app.public_dir.join("post").join(slug).join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, &html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated post: {:?}", output_path);
        written.push(slug.clone());
    }

    let index = app.renderer.render_index(&written)?;
    fs::write(app.public_dir.join("index.html"), index)?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages in {:.2}s",
        written.len(),
        duration.as_secs_f64()
    );

    Ok(written.len())
}
