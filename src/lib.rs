//! postview: server-rendered blog post pages backed by a headless content store
//!
//! A post is fetched by slug together with its approved comments, rendered
//! to HTML (hero image, rich-text body, byline, comment form and comment
//! list), and served either from a small HTTP server with a revalidation
//! cache or pre-rendered to static files. New comments are forwarded to the
//! moderation backend's write endpoint.

pub mod cache;
pub mod commands;
pub mod comments;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod image;
pub mod render;
pub mod server;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use comments::{CommentSink, HttpCommentSink};
use config::SiteConfig;
use content::{ContentStore, MemoryStore, Post, SanityClient};
use render::PageRenderer;

/// Name of the site configuration file in the base directory
pub const CONFIG_FILE: &str = "postview.yml";

/// The post page application
#[derive(Clone)]
pub struct PostView {
    /// Site configuration
    pub config: SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Read side: posts and comments
    pub store: Arc<dyn ContentStore>,
    /// Write side: new comments
    pub comments: Arc<dyn CommentSink>,
    /// Page renderer
    pub renderer: Arc<PageRenderer>,
}

impl PostView {
    /// Create an instance from a directory, talking to the hosted content store
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config = Self::load_config(base_dir.as_ref())?;
        let store = Arc::new(SanityClient::new(config.sanity.clone())?);
        Self::with_store(base_dir, config, store)
    }

    /// Create an instance that reads posts from a JSON fixture instead
    pub fn with_fixture<P: AsRef<Path>>(base_dir: P, fixture: &Path) -> Result<Self> {
        let config = Self::load_config(base_dir.as_ref())?;
        let store = Arc::new(MemoryStore::from_json_file(fixture)?);
        tracing::info!("Serving posts from fixture {:?}", fixture);
        Self::with_store(base_dir, config, store)
    }

    /// Assemble an instance around an existing store
    pub fn with_store<P: AsRef<Path>>(
        base_dir: P,
        config: SiteConfig,
        store: Arc<dyn ContentStore>,
    ) -> Result<Self> {
        let comments = Arc::new(HttpCommentSink::new(&config.comment_api_base));
        Self::with_parts(base_dir, config, store, comments)
    }

    /// Assemble an instance from all of its collaborators
    pub fn with_parts<P: AsRef<Path>>(
        base_dir: P,
        config: SiteConfig,
        store: Arc<dyn ContentStore>,
        comments: Arc<dyn CommentSink>,
    ) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let renderer_config = config.renderer_config()?;
        let renderer = Arc::new(PageRenderer::new(config.clone(), renderer_config)?);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
            store,
            comments,
            renderer,
        })
    }

    /// Read `postview.yml` (or defaults) and overlay the environment
    pub fn load_config(base_dir: &Path) -> Result<SiteConfig> {
        let config_path = base_dir.join(CONFIG_FILE);
        let mut config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            SiteConfig::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Every known post slug
    pub async fn static_paths(&self) -> Result<Vec<String>> {
        self.store.post_slugs().await
    }

    /// One post by slug, `None` when it does not exist
    pub async fn static_props(&self, slug: &str) -> Result<Option<Post>> {
        self.store.post_by_slug(slug).await
    }

    /// Generate the static pages
    pub async fn generate(&self) -> anyhow::Result<usize> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::testing::ScriptedSink;

    #[tokio::test]
    async fn test_every_static_path_has_props() {
        let dir = tempfile::tempdir().unwrap();
        let app = testing::app(dir.path(), Arc::new(ScriptedSink::succeeding()));

        let paths = app.static_paths().await.unwrap();
        assert_eq!(paths.len(), 2);
        for slug in &paths {
            assert!(app.static_props(slug).await.unwrap().is_some());
        }
        assert!(app.static_props("does-not-exist").await.unwrap().is_none());
    }

    #[test]
    fn test_missing_renderer_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PostView::with_parts(
            dir.path(),
            SiteConfig::default(),
            testing::store(),
            Arc::new(ScriptedSink::succeeding()),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "title: Fixture Blog\npublic_dir: out\n",
        )
        .unwrap();
        let config = PostView::load_config(dir.path()).unwrap();
        assert_eq!(config.title, "Fixture Blog");
        assert_eq!(config.public_dir, "out");
    }
}
