//! List known post routes

use anyhow::Result;

use crate::helpers::post_path;
use crate::PostView;

/// Print every post slug with its route
pub async fn run(app: &PostView) -> Result<()> {
    let slugs = app.static_paths().await?;

    println!("Posts ({}):", slugs.len());
    for slug in &slugs {
        println!("  {}  {}", slug, post_path(&app.config, slug));
    }

    Ok(())
}
