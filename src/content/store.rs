//! Content store access
//!
//! [`ContentStore`] is the read side of the page: enumerate slugs and fetch a
//! single post. [`SanityClient`] talks to the hosted query API;
//! [`MemoryStore`] keeps documents in memory for fixtures and tests.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use super::post::{Comment, Post, Slug};
use super::query;
use crate::config::SanityConfig;
use crate::error::{Error, Result};

/// Read-only access to posts
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Slugs of every post, one per route
    async fn post_slugs(&self) -> Result<Vec<String>>;

    /// The post with this slug and its approved comments, `None` if missing
    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>>;
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct PathEntry {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    slug: Option<Slug>,
}

/// HTTP client for the hosted query API
pub struct SanityClient {
    client: reqwest::Client,
    config: SanityConfig,
    base_url: String,
}

impl SanityClient {
    pub fn new(config: SanityConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() {
            return Err(Error::Config(
                "sanity project id is not set (SANITY_PROJECT_ID)".to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.query_url(),
            config,
        })
    }

    /// Send queries to another endpoint, e.g. a proxy or a local mirror
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Build the GET url for a query and its `$`-prefixed JSON parameters
    pub fn query_url(&self, groq: &str, params: &[(&str, serde_json::Value)]) -> String {
        let mut url = format!(
            "{}?query={}",
            self.base_url,
            utf8_percent_encode(groq, NON_ALPHANUMERIC)
        );
        for (name, value) in params {
            url.push_str(&format!(
                "&%24{}={}",
                name,
                utf8_percent_encode(&value.to_string(), NON_ALPHANUMERIC)
            ));
        }
        url
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, serde_json::Value)],
    ) -> Result<T> {
        let url = self.query_url(groq, params);
        tracing::debug!("Querying content store: {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Store(format!("{} - {}", status, body)));
        }

        let parsed: QueryResponse<T> = serde_json::from_str(&body)?;
        Ok(parsed.result)
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn post_slugs(&self) -> Result<Vec<String>> {
        let entries: Vec<PathEntry> = self.fetch(query::POST_PATHS, &[]).await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| match entry.slug {
                Some(slug) if !slug.current.is_empty() => Some(slug.current),
                _ => {
                    tracing::debug!("Skipping post {} without a slug", entry.id);
                    None
                }
            })
            .collect())
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let params = [("slug", serde_json::Value::String(slug.to_string()))];
        self.fetch(query::POST_BY_SLUG, &params).await
    }
}

/// A comment document as stored, before moderation filtering
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StoredComment {
    /// Id of the post this comment belongs to
    post: String,
    #[serde(flatten)]
    comment: Comment,
}

#[derive(Debug, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    comments: Vec<StoredComment>,
}

/// In-memory document set with the same read semantics as the hosted store
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<Post>>,
    comments: RwLock<Vec<StoredComment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON fixture of the form `{ "posts": [...], "comments": [...] }`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;
        Ok(Self {
            posts: RwLock::new(fixture.posts),
            comments: RwLock::new(fixture.comments),
        })
    }

    /// Insert or replace a post (matched by id)
    pub fn insert_post(&self, post: Post) {
        let mut posts = self.posts.write().unwrap_or_else(|e| e.into_inner());
        posts.retain(|p| p.id != post.id);
        posts.push(post);
    }

    /// Delete the post with this slug
    pub fn remove_post(&self, slug: &str) {
        let mut posts = self.posts.write().unwrap_or_else(|e| e.into_inner());
        posts.retain(|p| p.slug() != Some(slug));
    }

    /// Attach a comment document to a post, approved or not
    pub fn add_comment(&self, post_id: &str, comment: Comment) {
        let mut comments = self.comments.write().unwrap_or_else(|e| e.into_inner());
        comments.push(StoredComment {
            post: post_id.to_string(),
            comment,
        });
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn post_slugs(&self) -> Result<Vec<String>> {
        let posts = self.posts.read().unwrap_or_else(|e| e.into_inner());
        Ok(posts
            .iter()
            .filter_map(|p| p.slug().map(str::to_string))
            .collect())
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let posts = self.posts.read().unwrap_or_else(|e| e.into_inner());
        let Some(mut post) = posts.iter().find(|p| p.slug() == Some(slug)).cloned() else {
            return Ok(None);
        };

        let comments = self.comments.read().unwrap_or_else(|e| e.into_inner());
        post.comments = comments
            .iter()
            .filter(|c| c.post == post.id && c.comment.approved)
            .map(|c| c.comment.clone())
            .collect();

        Ok(Some(post))
    }
}
